use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use octofit_tracker::models::{Activity, Team, User};
use octofit_tracker::services::recompute;
use uuid::Uuid;

const ACTIVITY_TYPES: [&str; 5] = ["Running", "Cycling", "Swimming", "Yoga", "Boxing"];

/// Synthetic population: `users` users spread over 20 teams, ten activities
/// each, plus a sprinkling of activities whose owner no longer exists.
fn population(users: usize) -> (Vec<User>, Vec<Team>, Vec<Activity>) {
    let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let teams: Vec<Team> = (0..20)
        .map(|n| Team {
            id: Uuid::new_v4(),
            name: format!("Team {n}"),
            description: None,
            members: vec![],
            total_points: 0,
            created_at: epoch + Duration::seconds(n),
        })
        .collect();

    let users: Vec<User> = (0..users)
        .map(|n| User {
            id: Uuid::new_v4(),
            username: format!("user{n}"),
            email: format!("user{n}@example.com"),
            full_name: format!("User {n}"),
            age: None,
            weight: None,
            height: None,
            fitness_level: None,
            // Every seventh user has no team
            team_id: (n % 7 != 0).then(|| teams[n % teams.len()].id),
            created_at: epoch + Duration::seconds(n as i64),
        })
        .collect();

    let mut activities = Vec::with_capacity(users.len() * 10);
    for (n, user) in users.iter().enumerate() {
        for k in 0..10 {
            activities.push(Activity {
                id: Uuid::new_v4(),
                user_id: if (n + k) % 97 == 0 { Uuid::new_v4() } else { user.id },
                username: user.username.clone(),
                activity_type: ACTIVITY_TYPES[k % ACTIVITY_TYPES.len()].to_string(),
                duration: 30,
                distance: None,
                calories_burned: Some(250),
                points: ((n * 31 + k * 17) % 120) as i64,
                date: epoch + Duration::hours((n * 10 + k) as i64),
                notes: None,
            });
        }
    }

    (users, teams, activities)
}

fn benchmark_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaderboard_recompute");
    let now = Utc::now();

    for size in [100, 1_000, 10_000] {
        let (users, teams, activities) = population(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                recompute(
                    black_box(&users),
                    black_box(&teams),
                    black_box(&activities),
                    now,
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_recompute);
criterion_main!(benches);
