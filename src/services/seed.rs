//! Demo data seeder.
//!
//! Clears the store and loads two hero teams with members, a deterministic
//! set of activities, computed leaderboards, and the workout templates.

use crate::db::FitnessStore;
use crate::error::Result;
use crate::models::{default_points, Activity, FitnessLevel, Team, User, Workout};
use crate::services::LeaderboardService;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

const ACTIVITY_TYPES: [&str; 9] = [
    "Running",
    "Swimming",
    "Cycling",
    "Weight Training",
    "Yoga",
    "Boxing",
    "HIIT",
    "CrossFit",
    "Rock Climbing",
];

/// Activity types that record a distance.
const DISTANCE_TYPES: [&str; 3] = ["Running", "Swimming", "Cycling"];

struct Hero {
    username: &'static str,
    email: &'static str,
    full_name: &'static str,
    age: u32,
    weight: f64,
    height: f64,
}

const MARVEL: [Hero; 5] = [
    Hero {
        username: "ironman",
        email: "tony.stark@avengers.com",
        full_name: "Tony Stark",
        age: 48,
        weight: 102.0,
        height: 185.0,
    },
    Hero {
        username: "captainamerica",
        email: "steve.rogers@avengers.com",
        full_name: "Steve Rogers",
        age: 105,
        weight: 109.0,
        height: 188.0,
    },
    Hero {
        username: "thor",
        email: "thor.odinson@asgard.com",
        full_name: "Thor Odinson",
        age: 1500,
        weight: 290.0,
        height: 198.0,
    },
    Hero {
        username: "blackwidow",
        email: "natasha.romanoff@avengers.com",
        full_name: "Natasha Romanoff",
        age: 36,
        weight: 59.0,
        height: 170.0,
    },
    Hero {
        username: "hulk",
        email: "bruce.banner@avengers.com",
        full_name: "Bruce Banner",
        age: 49,
        weight: 128.0,
        height: 175.0,
    },
];

const DC: [Hero; 5] = [
    Hero {
        username: "superman",
        email: "clark.kent@dailyplanet.com",
        full_name: "Clark Kent",
        age: 35,
        weight: 107.0,
        height: 191.0,
    },
    Hero {
        username: "batman",
        email: "bruce.wayne@wayneenterprises.com",
        full_name: "Bruce Wayne",
        age: 42,
        weight: 95.0,
        height: 188.0,
    },
    Hero {
        username: "wonderwoman",
        email: "diana.prince@themyscira.com",
        full_name: "Diana Prince",
        age: 5000,
        weight: 74.0,
        height: 183.0,
    },
    Hero {
        username: "flash",
        email: "barry.allen@ccpd.com",
        full_name: "Barry Allen",
        age: 29,
        weight: 82.0,
        height: 180.0,
    },
    Hero {
        username: "aquaman",
        email: "arthur.curry@atlantis.com",
        full_name: "Arthur Curry",
        age: 37,
        weight: 148.0,
        height: 185.0,
    },
];

struct WorkoutTemplate {
    name: &'static str,
    description: &'static str,
    level: FitnessLevel,
    duration: u32,
    activity_type: &'static str,
    exercises: &'static [&'static str],
    estimated_calories: u32,
    points: i64,
}

const WORKOUTS: [WorkoutTemplate; 8] = [
    WorkoutTemplate {
        name: "Hero Morning Routine",
        description: "Start your day like a superhero with this energizing workout",
        level: FitnessLevel::Beginner,
        duration: 30,
        activity_type: "HIIT",
        exercises: &["Jumping Jacks", "Push-ups", "Squats", "Plank", "Burpees"],
        estimated_calories: 250,
        points: 30,
    },
    WorkoutTemplate {
        name: "Avenger Strength Training",
        description: "Build strength worthy of an Avenger",
        level: FitnessLevel::Intermediate,
        duration: 45,
        activity_type: "Weight Training",
        exercises: &["Bench Press", "Deadlifts", "Squats", "Pull-ups", "Shoulder Press"],
        estimated_calories: 400,
        points: 50,
    },
    WorkoutTemplate {
        name: "Justice League Cardio Blast",
        description: "High-intensity cardio to match the Flash",
        level: FitnessLevel::Advanced,
        duration: 60,
        activity_type: "Running",
        exercises: &["Sprint Intervals", "Hill Runs", "Tempo Run", "Cool Down Jog"],
        estimated_calories: 600,
        points: 70,
    },
    WorkoutTemplate {
        name: "Warrior Yoga Flow",
        description: "Find your inner peace and flexibility like Wonder Woman",
        level: FitnessLevel::Beginner,
        duration: 45,
        activity_type: "Yoga",
        exercises: &["Sun Salutation", "Warrior Poses", "Tree Pose", "Downward Dog", "Shavasana"],
        estimated_calories: 200,
        points: 40,
    },
    WorkoutTemplate {
        name: "Thor Hammer Workout",
        description: "Swing into action with this full-body power workout",
        level: FitnessLevel::Advanced,
        duration: 50,
        activity_type: "CrossFit",
        exercises: &["Kettlebell Swings", "Box Jumps", "Rope Climbs", "Tire Flips", "Battle Ropes"],
        estimated_calories: 550,
        points: 65,
    },
    WorkoutTemplate {
        name: "Black Widow Agility Training",
        description: "Develop speed, agility, and precision",
        level: FitnessLevel::Intermediate,
        duration: 40,
        activity_type: "HIIT",
        exercises: &["Ladder Drills", "Box Jumps", "Cone Drills", "Jump Rope", "Mountain Climbers"],
        estimated_calories: 350,
        points: 45,
    },
    WorkoutTemplate {
        name: "Aquaman Swimming Challenge",
        description: "Dive into this comprehensive swimming workout",
        level: FitnessLevel::Intermediate,
        duration: 45,
        activity_type: "Swimming",
        exercises: &[
            "Freestyle Laps",
            "Backstroke",
            "Butterfly",
            "Treading Water",
            "Underwater Holds",
        ],
        estimated_calories: 450,
        points: 55,
    },
    WorkoutTemplate {
        name: "Batman Combat Training",
        description: "Master hand-to-hand combat techniques",
        level: FitnessLevel::Advanced,
        duration: 55,
        activity_type: "Boxing",
        exercises: &["Heavy Bag Work", "Speed Bag", "Shadow Boxing", "Pad Work", "Footwork Drills"],
        estimated_calories: 500,
        points: 60,
    },
];

/// Collection sizes after seeding.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PopulateSummary {
    pub teams: usize,
    pub users: usize,
    pub activities: usize,
    pub leaderboard_entries: usize,
    pub workouts: usize,
}

/// Activities for the hero at `hero_index`: 3 to 7 of them, each with a
/// duration of 15–120 minutes and 100–800 calories.
///
/// Values are spread with small co-prime strides so seeding is reproducible.
fn hero_activities(user: &User, hero_index: usize, seeded_at: DateTime<Utc>) -> Vec<Activity> {
    let count = 3 + (hero_index * 3) % 5;

    (0..count)
        .map(|n| {
            let k = hero_index * 7 + n;
            let activity_type = ACTIVITY_TYPES[(hero_index + n * 4) % ACTIVITY_TYPES.len()];
            let duration = 15 + ((k * 37) % 106) as u32;
            let calories = 100 + ((k * 113) % 701) as u32;
            let distance = DISTANCE_TYPES
                .contains(&activity_type)
                .then(|| 1.0 + ((k * 53) % 1901) as f64 / 100.0);

            Activity {
                id: Uuid::new_v4(),
                user_id: user.id,
                username: user.username.clone(),
                activity_type: activity_type.to_string(),
                duration,
                distance,
                calories_burned: Some(calories),
                points: default_points(duration, Some(calories)),
                date: seeded_at - Duration::hours((k * 5) as i64),
                notes: Some(format!("Great {} session!", activity_type.to_lowercase())),
            }
        })
        .collect()
}

/// Replace the store contents with the demo data set.
///
/// Recomputation passes are held off until seeding finishes, so no pass
/// reads a half-cleared store or writes totals onto removed teams.
pub async fn populate(
    store: &dyn FitnessStore,
    leaderboard: &LeaderboardService,
) -> Result<PopulateSummary> {
    let passes = leaderboard.hold_passes().await;

    tracing::info!("Clearing existing data");
    store.clear_all().await?;

    let now = Utc::now();

    let mut marvel = Team {
        id: Uuid::new_v4(),
        name: "Team Marvel".to_string(),
        description: Some("Avengers assemble! The mightiest heroes of Earth.".to_string()),
        members: vec![],
        total_points: 0,
        created_at: now,
    };
    let mut dc = Team {
        id: Uuid::new_v4(),
        name: "Team DC".to_string(),
        description: Some("Justice League - Guardians of truth and justice.".to_string()),
        members: vec![],
        total_points: 0,
        created_at: now + Duration::milliseconds(1),
    };

    let mut users = Vec::with_capacity(MARVEL.len() + DC.len());
    for (team, heroes) in [(&mut marvel, &MARVEL), (&mut dc, &DC)] {
        for hero in heroes.iter() {
            let user = User {
                id: Uuid::new_v4(),
                username: hero.username.to_string(),
                email: hero.email.to_string(),
                full_name: hero.full_name.to_string(),
                age: Some(hero.age),
                weight: Some(hero.weight),
                height: Some(hero.height),
                fitness_level: Some(FitnessLevel::Advanced),
                team_id: Some(team.id),
                created_at: now + Duration::milliseconds(users.len() as i64),
            };
            team.add_member(&user.username);
            users.push(user);
        }
    }

    store.save_team(&marvel).await?;
    store.save_team(&dc).await?;
    for user in &users {
        store.save_user(user).await?;
    }
    tracing::info!(teams = 2, users = users.len(), "Created teams and users");

    let mut activity_count = 0;
    for (index, user) in users.iter().enumerate() {
        for activity in hero_activities(user, index, now) {
            store.save_activity(&activity).await?;
            activity_count += 1;
        }
    }
    tracing::info!(activities = activity_count, "Created activities");

    let rankings = passes.recompute_leaderboard().await?;

    for (index, template) in WORKOUTS.iter().enumerate() {
        let workout = Workout {
            id: Uuid::new_v4(),
            name: template.name.to_string(),
            description: template.description.to_string(),
            fitness_level: template.level,
            duration: template.duration,
            activity_type: template.activity_type.to_string(),
            exercises: template.exercises.iter().map(|e| e.to_string()).collect(),
            estimated_calories: Some(template.estimated_calories),
            points: template.points,
            created_at: now + Duration::milliseconds(index as i64),
        };
        store.save_workout(&workout).await?;
    }

    let summary = PopulateSummary {
        teams: 2,
        users: users.len(),
        activities: activity_count,
        leaderboard_entries: rankings.users.len() + rankings.teams.len(),
        workouts: WORKOUTS.len(),
    };
    tracing::info!(?summary, "Database population complete");

    Ok(summary)
}
