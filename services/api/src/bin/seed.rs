//! services/api/src/bin/seed.rs
//!
//! Wipes the Postgres store and fills it with demo users, categories,
//! entries and comments. Every seeded user's password is `password123`,
//! except `admin` whose password is `admin123`.

use api_lib::{adapters::DbAdapter, config::Config, error::ApiError};
use chrono::{DateTime, Duration, TimeZone, Utc};
use football_blog_core::{
    BlogEntry, Category, Confidence, DatabaseService, EntryDraft, Image, Link, NewUser, Prediction,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// 1x1 PNG used for every seeded image.
const SAMPLE_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

// (username, first name, last name, email, password)
const USERS: [(&str, &str, &str, &str, &str); 5] = [
    ("admin", "Admin", "User", "admin@example.com", "admin123"),
    ("john_doe", "John", "Doe", "john@example.com", "password123"),
    ("jane_smith", "Jane", "Smith", "jane@example.com", "password123"),
    ("soccer_analyst", "Soccer", "Analyst", "soccer@example.com", "password123"),
    ("football_fan", "Football", "Fan", "football@example.com", "password123"),
];

const CATEGORIES: [(&str, &str); 5] = [
    ("Bundesliga", "Predictions and analysis for German Bundesliga matches"),
    ("Champions League", "UEFA Champions League match previews and predictions"),
    ("Premier League", "English Premier League predictions and analysis"),
    ("La Liga", "Spanish La Liga match predictions"),
    ("World Cup", "International football tournaments and World Cup predictions"),
];

struct SeedPrediction {
    home: &'static str,
    away: &'static str,
    score: &'static str,
    date: (i32, u32, u32),
    confidence: i64,
}

/// Entry `i` is written by user `i` into category `i`.
struct SeedEntry {
    title: &'static str,
    description: &'static str,
    content: &'static str,
    captions: &'static [&'static str],
    link: (&'static str, &'static str),
    hashtags: [&'static str; 3],
    prediction: SeedPrediction,
}

const ENTRIES: [SeedEntry; 5] = [
    SeedEntry {
        title: "Bayern München vs. Borussia Dortmund Prediction",
        description: "My prediction for the upcoming Bundesliga clash between Bayern and Dortmund",
        content: "The Der Klassiker showdown between Bayern Munich and Borussia Dortmund promises fireworks this weekend. After analyzing recent form, I believe Bayern will edge this one 2-1.",
        captions: &["Bayern Munich Stadium", "Dortmund Players"],
        link: ("https://www.bundesliga.com", "Bundesliga Official Site"),
        hashtags: ["#DerKlassiker", "#BayernDortmund", "#Bundesliga"],
        prediction: SeedPrediction {
            home: "Bayern Munich",
            away: "Borussia Dortmund",
            score: "2-1",
            date: (2025, 4, 20),
            confidence: 4,
        },
    },
    SeedEntry {
        title: "Champions League Final Prediction",
        description: "Who will win this year's Champions League?",
        content: "The Champions League final between Real Madrid and Manchester City will be a tactical masterclass. I predict Manchester City will finally claim the trophy with a 2-0 victory.",
        captions: &["Champions League Trophy"],
        link: ("https://www.uefa.com/uefachampionsleague/", "UEFA Champions League"),
        hashtags: ["#UCL", "#ChampionsLeague", "#Final"],
        prediction: SeedPrediction {
            home: "Real Madrid",
            away: "Manchester City",
            score: "0-2",
            date: (2025, 5, 31),
            confidence: 3,
        },
    },
    SeedEntry {
        title: "Liverpool's Premier League Title Chances",
        description: "Analyzing Liverpool's road to the Premier League title",
        content: "Liverpool has shown incredible form this season. Their pressing game and clinical finishing make them my favorites for the Premier League title. I predict they'll finish 4 points clear at the top.",
        captions: &["Anfield Stadium"],
        link: ("https://www.premierleague.com", "Premier League Official Site"),
        hashtags: ["#Liverpool", "#PremierLeague", "#Title"],
        prediction: SeedPrediction {
            home: "Liverpool",
            away: "Manchester City",
            score: "2-1",
            date: (2025, 5, 10),
            confidence: 5,
        },
    },
    SeedEntry {
        title: "Barcelona's Rebuilding Season in La Liga",
        description: "How Barcelona will perform this season under new management",
        content: "Barcelona is in a rebuilding phase with their new manager. They have exciting young talents but will struggle against the top teams. I predict they'll finish 3rd in La Liga this season.",
        captions: &["Camp Nou", "Barcelona Team"],
        link: ("https://www.laliga.com", "La Liga Official Site"),
        hashtags: ["#Barcelona", "#LaLiga", "#Rebuilding"],
        prediction: SeedPrediction {
            home: "Barcelona",
            away: "Real Madrid",
            score: "1-2",
            date: (2025, 4, 25),
            confidence: 3,
        },
    },
    SeedEntry {
        title: "World Cup 2026 Early Predictions",
        description: "Early look at the favorites for the 2026 World Cup",
        content: "The 2026 World Cup in North America will be the biggest ever. France, Brazil, and England look like early favorites, but I'm picking Brazil to win their 6th title.",
        captions: &["World Cup Trophy"],
        link: ("https://www.fifa.com/worldcup/", "FIFA World Cup"),
        hashtags: ["#WorldCup2026", "#Brazil", "#Predictions"],
        prediction: SeedPrediction {
            home: "Brazil",
            away: "France",
            score: "3-2",
            date: (2026, 7, 15),
            confidence: 4,
        },
    },
];

// (entry index, author index, content)
const COMMENTS: [(usize, usize, &str); 4] = [
    (0, 1, "I disagree. I think Dortmund has the edge in midfield and will win 2-1."),
    (0, 2, "Great analysis! I think you're spot on with the 2-1 prediction."),
    (1, 0, "Real Madrid has too much experience in finals. I predict they'll win 2-1."),
    (2, 3, "Liverpool does look strong, but don't count out Manchester City just yet!"),
];

fn match_date((year, month, day): (i32, u32, u32)) -> Result<DateTime<Utc>, ApiError> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| ApiError::Internal(format!("Invalid seed date {year}-{month}-{day}")))
}

fn build_draft(seed: &SeedEntry, category_id: Uuid) -> Result<EntryDraft, ApiError> {
    let confidence = Confidence::new(seed.prediction.confidence)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(EntryDraft {
        title: seed.title.to_string(),
        description: seed.description.to_string(),
        content: seed.content.to_string(),
        category_id,
        comments_allowed: Some(true),
        images: Some(
            seed.captions
                .iter()
                .map(|caption| Image {
                    data: SAMPLE_IMAGE.to_string(),
                    caption: Some(caption.to_string()),
                })
                .collect(),
        ),
        links: Some(vec![Link {
            url: seed.link.0.to_string(),
            title: seed.link.1.to_string(),
        }]),
        hashtags: Some(seed.hashtags.iter().map(|h| h.to_string()).collect()),
        predictions: Some(vec![Prediction {
            home_team: seed.prediction.home.to_string(),
            away_team: seed.prediction.away.to_string(),
            predicted_score: seed.prediction.score.to_string(),
            match_date: match_date(seed.prediction.date)?,
            confidence,
        }]),
    })
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.uses_memory_store() {
        return Err(ApiError::Internal(
            "Seeding needs a Postgres DATABASE_URL".to_string(),
        ));
    }

    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    let db = DbAdapter::new(db_pool);
    db.run_migrations().await?;

    db.truncate_all().await?;
    info!("Existing data cleared");

    let mut user_ids = Vec::with_capacity(USERS.len());
    for (username, first_name, last_name, email, password) in USERS {
        let new_user = NewUser::register(username, first_name, last_name, email, password)?;
        user_ids.push(db.create_user(&new_user).await?.id);
    }
    info!("{} users created", user_ids.len());

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, description) in CATEGORIES {
        let category = Category::new(name, description);
        db.create_category(&category).await?;
        category_ids.push(category.id);
    }
    info!("{} categories created", category_ids.len());

    // Spaced a second apart so creation order is stable.
    let base = Utc::now() - Duration::seconds(ENTRIES.len() as i64);
    let mut entries = Vec::with_capacity(ENTRIES.len());
    for (i, seed) in ENTRIES.iter().enumerate() {
        let draft = build_draft(seed, category_ids[i])?;
        let created_at = base + Duration::seconds(i as i64);
        let entry = BlogEntry::create(Uuid::new_v4(), user_ids[i], draft, created_at);
        db.insert_entry(&entry).await?;
        entries.push(entry);
    }
    info!("{} blog entries created", entries.len());

    let now = Utc::now();
    for (entry_index, author_index, content) in COMMENTS {
        let comment = entries[entry_index]
            .open_comment(user_ids[author_index], content, now)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        db.insert_comment(&comment).await?;
    }
    info!("{} comments created", COMMENTS.len());

    info!("Database seeded successfully!");
    Ok(())
}
