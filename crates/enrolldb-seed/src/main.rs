//! EnrollDB Seed - populates a database with sample enrollment data and
//! prints the fully joined registration view.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use enrolldb_core::{
    Database, EntityId, EntityType, Error, JoinPlan, OrderBy, StorageConfig, Value,
};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "enrolldb-seed", about = "Seed EnrollDB with sample data")]
struct Args {
    /// Path to the database directory.
    #[arg(long, default_value = "./enrolldb_data")]
    data_dir: PathBuf,

    /// Use a temporary database (discarded on exit).
    #[arg(long)]
    temporary: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enrolldb_seed=info,enrolldb_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = if args.temporary {
        StorageConfig::temporary()
    } else {
        StorageConfig::new(&args.data_dir)
    };

    tracing::info!(data_dir = %args.data_dir.display(), temporary = args.temporary, "opening database");
    let db = Database::open(config)?;

    clear(&db)?;
    seed(&db)?;
    db.flush()?;

    // Print the registration view: every schedule row with its enrollment,
    // student, course, and subject materialized.
    let plan = JoinPlan::new()
        .expand_with(
            "FK_Enrollment_ID",
            JoinPlan::new().expand("FK_Student_ID").expand("FK_Course_ID"),
        )
        .expand("FK_Subject_Code");

    let views = db.resolver().resolve_all(
        EntityType::StudentSchedule,
        None,
        Some(&OrderBy::asc("Schedule_ID")),
        &plan,
    )?;

    println!("{}", serde_json::to_string_pretty(&views)?);
    tracing::info!(schedules = views.len(), "seed complete");
    Ok(())
}

/// Remove existing records, dependents first.
fn clear(db: &Database) -> Result<(), Error> {
    let mutations = db.mutations();
    let order = [
        EntityType::StudentSchedule,
        EntityType::Enrollment,
        EntityType::Subject,
        EntityType::Course,
        EntityType::Student,
    ];
    for entity in order {
        let rows = db.store().find_all(entity, None, None)?;
        for (id, _) in &rows {
            mutations.delete(entity, *id)?;
        }
        if !rows.is_empty() {
            tracing::info!(entity = %entity, count = rows.len(), "cleared existing records");
        }
    }
    Ok(())
}

fn seed(db: &Database) -> Result<(), Error> {
    let mutations = db.mutations();

    let students = [
        (1, "Aranas", "Bennedict", "S", "Malaybalay", "Bukidnon", "8700", "09325462145"),
        (2, "Bautista", "David", "A", "Valencia", "Bukidnon", "9000", "09937783823"),
        (3, "Corales", "John", "D", "Malaybalay", "Bukidnon", "8700", "09058073523"),
        (4, "Dag-um", "Christopher", "K", "Cagayan de oro", "Misamis oriental", "5600", "09974415219"),
        (5, "Esteban", "Cedric", "O", "Tarlac", "Tarlac", "7200", "09694183691"),
    ];
    let mut student_ids = Vec::new();
    for (id, last, first, mi, city, province, postal, phone) in students {
        student_ids.push(mutations.create(
            EntityType::Student,
            vec![
                ("Student_ID".to_string(), Value::Int64(id)),
                ("Last_Name".to_string(), Value::from(last)),
                ("First_Name".to_string(), Value::from(first)),
                ("Middle_Initial".to_string(), Value::from(mi)),
                ("City".to_string(), Value::from(city)),
                ("Province".to_string(), Value::from(province)),
                ("Postal_Code".to_string(), Value::from(postal)),
                ("Phone_Number".to_string(), Value::from(phone)),
            ],
        )?);
    }
    tracing::info!(count = student_ids.len(), "students inserted");

    let courses = [
        (101, "Nursing", "Nursing"),
        (102, "Information Technology", "Technology"),
        (103, "Computer Science", "Technology"),
        (107, "Secondary Education Major in Mathematics", "Education"),
    ];
    let mut course_ids = Vec::new();
    for (id, name, department) in courses {
        course_ids.push(mutations.create(
            EntityType::Course,
            vec![
                ("Course_ID".to_string(), Value::Int64(id)),
                ("Name".to_string(), Value::from(name)),
                ("Department".to_string(), Value::from(department)),
            ],
        )?);
    }
    let [nursing, it, cs, education] = [course_ids[0], course_ids[1], course_ids[2], course_ids[3]];
    tracing::info!(count = course_ids.len(), "courses inserted");

    let subjects = [
        ("T125", "Intro To Computing", 3),
        ("TE256", "Human Computer Interaction", 3),
        ("GE340", "Mathematics in the modern World", 2),
        ("T255", "Computer Programming", 3),
        ("T254", "Information Management", 3),
    ];
    let mut subject_ids = Vec::new();
    for (code, name, units) in subjects {
        subject_ids.push(mutations.create(
            EntityType::Subject,
            vec![
                ("Subject_Code".to_string(), Value::from(code)),
                ("Name".to_string(), Value::from(name)),
                ("Units".to_string(), Value::Int64(units)),
                ("FK_Course_ID".to_string(), Value::Ref(it)),
            ],
        )?);
    }
    tracing::info!(count = subject_ids.len(), "subjects inserted");

    // Dates are midnight UTC, microseconds since Unix epoch
    const AUG_19_2025: i64 = 1_755_561_600_000_000;
    const AUG_23_2025: i64 = 1_755_907_200_000_000;
    const AUG_24_2025: i64 = 1_755_993_600_000_000;
    const AUG_25_2025: i64 = 1_756_080_000_000_000;

    let enrollments = [
        (61, AUG_19_2025, 1, nursing, student_ids[0]),
        (71, AUG_23_2025, 1, education, student_ids[1]),
        (62, AUG_23_2025, 2, it, student_ids[2]),
        (63, AUG_24_2025, 4, it, student_ids[3]),
        (64, AUG_25_2025, 3, cs, student_ids[4]),
    ];
    let mut first_enrollment: Option<EntityId> = None;
    for (id, date, year_level, course, student) in enrollments {
        let created = mutations.create(
            EntityType::Enrollment,
            vec![
                ("Enrollment_ID".to_string(), Value::Int64(id)),
                ("Date_Enrolled".to_string(), Value::Timestamp(date)),
                ("Year_Level".to_string(), Value::Int64(year_level)),
                ("FK_Course_ID".to_string(), Value::Ref(course)),
                ("FK_Student_ID".to_string(), Value::Ref(student)),
            ],
        )?;
        if id == 61 {
            first_enrollment = Some(created);
        }
    }
    tracing::info!(count = enrollments.len(), "enrollments inserted");

    let enrollment1 = first_enrollment.ok_or(Error::NotFound)?;
    let schedules = [
        (1, 0usize, "1", "7:30-9"),
        (2, 1, "2", "9:30-12"),
        (3, 2, "3", "1:30-3"),
        (4, 3, "4", "3:30-5"),
        (5, 4, "5", "5:30-7"),
    ];
    for (id, subject_idx, room, time) in schedules {
        mutations.create(
            EntityType::StudentSchedule,
            vec![
                ("Schedule_ID".to_string(), Value::Int64(id)),
                ("FK_Enrollment_ID".to_string(), Value::Ref(enrollment1)),
                ("FK_Subject_Code".to_string(), Value::Ref(subject_ids[subject_idx])),
                ("Room".to_string(), Value::from(room)),
                ("Class_Schedule".to_string(), Value::from(time)),
            ],
        )?;
    }
    tracing::info!(count = schedules.len(), "schedules inserted");

    Ok(())
}
