//! The academic-enrollment schema: five entities and their rules.

use super::catalog::Catalog;
use super::constraint::ConstraintDef;
use super::entity::{EntityDef, EntityType};
use super::field::FieldDef;

impl Catalog {
    /// Build the academic-enrollment catalog.
    ///
    /// Business keys are unique per entity; every foreign-key edge points at
    /// the referenced entity's internal identity. A student cannot hold two
    /// schedule rows for the same subject within one enrollment, so
    /// StudentSchedule carries a compound uniqueness constraint over its
    /// enrollment and subject references.
    pub fn school() -> Self {
        let student = EntityDef::new(EntityType::Student, "Student_ID")
            .with_field(FieldDef::int("Student_ID"))
            .with_field(FieldDef::text("Last_Name"))
            .with_field(FieldDef::text("First_Name"))
            .with_field(FieldDef::optional_text("Middle_Initial").uppercased())
            .with_field(FieldDef::optional_text("City"))
            .with_field(FieldDef::optional_text("Province"))
            .with_field(FieldDef::optional_text("Postal_Code"))
            .with_field(FieldDef::optional_text("Phone_Number"))
            .with_constraint(ConstraintDef::unique("student_id_unique", "Student_ID"))
            .with_constraint(ConstraintDef::positive("student_id_positive", "Student_ID"));

        let course = EntityDef::new(EntityType::Course, "Course_ID")
            .with_field(FieldDef::int("Course_ID"))
            .with_field(FieldDef::text("Name"))
            .with_field(FieldDef::text("Department"))
            .with_constraint(ConstraintDef::unique("course_id_unique", "Course_ID"))
            .with_constraint(ConstraintDef::unique("course_name_unique", "Name"))
            .with_constraint(ConstraintDef::positive("course_id_positive", "Course_ID"));

        let subject = EntityDef::new(EntityType::Subject, "Subject_Code")
            .with_field(FieldDef::text("Subject_Code").uppercased())
            .with_field(FieldDef::text("Name"))
            .with_field(FieldDef::int("Units"))
            .with_reference("FK_Course_ID", EntityType::Course)
            .with_constraint(ConstraintDef::unique("subject_code_unique", "Subject_Code"))
            .with_constraint(ConstraintDef::range("subject_units_range", "Units", 1, 6));

        let enrollment = EntityDef::new(EntityType::Enrollment, "Enrollment_ID")
            .with_field(FieldDef::int("Enrollment_ID"))
            .with_field(FieldDef::timestamp("Date_Enrolled"))
            .with_field(FieldDef::int("Year_Level"))
            .with_reference("FK_Course_ID", EntityType::Course)
            .with_reference("FK_Student_ID", EntityType::Student)
            .with_constraint(ConstraintDef::unique("enrollment_id_unique", "Enrollment_ID"))
            .with_constraint(ConstraintDef::positive(
                "enrollment_id_positive",
                "Enrollment_ID",
            ))
            .with_constraint(ConstraintDef::range("year_level_range", "Year_Level", 1, 5));

        let schedule = EntityDef::new(EntityType::StudentSchedule, "Schedule_ID")
            .with_field(FieldDef::int("Schedule_ID"))
            .with_reference("FK_Enrollment_ID", EntityType::Enrollment)
            .with_reference("FK_Subject_Code", EntityType::Subject)
            .with_field(FieldDef::optional_text("Room"))
            .with_field(FieldDef::optional_text("Class_Schedule"))
            .with_constraint(ConstraintDef::unique("schedule_id_unique", "Schedule_ID"))
            .with_constraint(ConstraintDef::unique_compound(
                "schedule_enrollment_subject_unique",
                ["FK_Enrollment_ID", "FK_Subject_Code"],
            ))
            .with_constraint(ConstraintDef::positive(
                "schedule_id_positive",
                "Schedule_ID",
            ));

        Self::from_definitions([student, course, subject, enrollment, schedule])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_keys() {
        let catalog = Catalog::school();
        assert_eq!(catalog.entity(EntityType::Student).business_key, "Student_ID");
        assert_eq!(
            catalog.entity(EntityType::Subject).business_key,
            "Subject_Code"
        );
    }

    #[test]
    fn test_foreign_key_edges() {
        let catalog = Catalog::school();

        let enrollment = catalog.entity(EntityType::Enrollment);
        assert_eq!(
            enrollment.relation_for("FK_Student_ID").unwrap().references,
            EntityType::Student
        );
        assert_eq!(
            enrollment.relation_for("FK_Course_ID").unwrap().references,
            EntityType::Course
        );

        let schedule = catalog.entity(EntityType::StudentSchedule);
        assert_eq!(
            schedule
                .relation_for("FK_Enrollment_ID")
                .unwrap()
                .references,
            EntityType::Enrollment
        );

        // Students and courses reference nothing
        assert!(catalog.entity(EntityType::Student).relations.is_empty());
        assert!(catalog.entity(EntityType::Course).relations.is_empty());
    }

    #[test]
    fn test_schedule_compound_uniqueness() {
        let catalog = Catalog::school();
        let schedule = catalog.entity(EntityType::StudentSchedule);

        let compound = schedule
            .unique_constraints()
            .find(|c| match c {
                ConstraintDef::Unique { fields, .. } => fields.len() == 2,
                _ => false,
            })
            .expect("compound constraint declared");

        if let ConstraintDef::Unique { fields, .. } = compound {
            assert_eq!(fields, &["FK_Enrollment_ID", "FK_Subject_Code"]);
        }
    }

    #[test]
    fn test_normalization_flags() {
        let catalog = Catalog::school();
        let subject = catalog.entity(EntityType::Subject);
        assert!(subject.field("Subject_Code").unwrap().uppercase);

        let student = catalog.entity(EntityType::Student);
        assert!(student.field("Middle_Initial").unwrap().uppercase);
        assert!(student.field("Last_Name").unwrap().trim);
        assert!(!student.field("Middle_Initial").unwrap().required);
    }
}
