//! Keeps word progress in SQLite the way the app's storage layer does: dates
//! as `YYYY-MM-DD` text, and "due" meaning `next_review <= today`.

use std::error::Error;

use chrono::{Days, NaiveDate};
use log::info;
use rusqlite::{Connection, Row, params};
use sm2::{
    FirstReviewPolicy, ItemProgress, MemoryState, QualityLabel, Scheduler, SessionSettings,
    Streak, format_date, parse_date,
};

const COLUMNS: &str =
    "word_id, ease_factor, interval, repetition, next_review, times_correct, times_seen, last_review";

fn setup_logging() -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
        })
        .level(log::LevelFilter::Info)
        .level_for("sm2", log::LevelFilter::Debug)
        .chain(std::io::stderr())
        .apply()
}

fn create_schema(db: &Connection) -> rusqlite::Result<()> {
    db.execute_batch(
        "CREATE TABLE word_progress (
            word_id INTEGER PRIMARY KEY,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval INTEGER NOT NULL DEFAULT 1,
            repetition INTEGER NOT NULL DEFAULT 0,
            next_review TEXT NOT NULL,
            times_correct INTEGER NOT NULL DEFAULT 0,
            times_seen INTEGER NOT NULL DEFAULT 0,
            last_review TEXT
        )",
    )
}

fn row_to_progress(row: &Row) -> Result<(i64, ItemProgress), Box<dyn Error>> {
    let state = MemoryState::from_stored(row.get(1)?, row.get(2)?, row.get(3)?);
    let next_review = parse_date(&row.get::<_, String>(4)?)?;
    let last_review = row
        .get::<_, Option<String>>(7)?
        .map(|date| parse_date(&date))
        .transpose()?;
    let progress = ItemProgress {
        state,
        next_review,
        times_correct: row.get(5)?,
        times_seen: row.get(6)?,
        last_review,
    };
    Ok((row.get(0)?, progress))
}

fn load(db: &Connection, word_id: i64) -> Result<Option<ItemProgress>, Box<dyn Error>> {
    let mut stmt =
        db.prepare_cached(&format!("SELECT {COLUMNS} FROM word_progress WHERE word_id = ?1"))?;
    let mut rows = stmt.query_and_then([word_id], row_to_progress)?;
    let found = rows.next().transpose()?;
    Ok(found.map(|(_, progress)| progress))
}

fn due_words(db: &Connection, today: NaiveDate) -> Result<Vec<i64>, Box<dyn Error>> {
    let mut stmt = db.prepare_cached(&format!(
        "SELECT {COLUMNS} FROM word_progress WHERE next_review <= ?1 ORDER BY next_review, word_id"
    ))?;
    let due = stmt
        .query_and_then([format_date(today)], row_to_progress)?
        .map(|row| row.map(|(word_id, _)| word_id))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(due)
}

fn save(db: &Connection, word_id: i64, progress: &ItemProgress) -> rusqlite::Result<()> {
    db.execute(
        &format!(
            "INSERT INTO word_progress ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(word_id) DO UPDATE SET
                ease_factor = excluded.ease_factor,
                interval = excluded.interval,
                repetition = excluded.repetition,
                next_review = excluded.next_review,
                times_correct = excluded.times_correct,
                times_seen = excluded.times_seen,
                last_review = excluded.last_review"
        ),
        params![
            word_id,
            progress.state.ease_factor,
            progress.state.interval,
            progress.state.repetition,
            format_date(progress.next_review),
            progress.times_correct,
            progress.times_seen,
            progress.last_review.map(format_date),
        ],
    )?;
    Ok(())
}

fn review(
    db: &mut Connection,
    scheduler: &Scheduler,
    streak: &mut Streak,
    word_id: i64,
    label: QualityLabel,
    today: NaiveDate,
) -> Result<(), Box<dyn Error>> {
    // read-modify-write of one record happens in a single transaction
    let tx = db.transaction()?;
    let existing = load(&tx, word_id)?;
    let progress = scheduler.review_item(FirstReviewPolicy::Word, existing.as_ref(), label, today);
    save(&tx, word_id, &progress)?;
    tx.commit()?;
    // any answer, new word or due review, counts as studying today
    streak.record_study(today);
    info!(
        "{today}: word {word_id} answered {label}, next review {} ({})",
        format_date(progress.next_review),
        progress.mastery(scheduler)
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    setup_logging()?;
    let mut db = Connection::open_in_memory()?;
    create_schema(&db)?;

    let scheduler = Scheduler::default();
    let settings = SessionSettings {
        daily_new_limit: 2,
    };
    let mut streak = Streak::default();
    let words: [i64; 4] = [1, 2, 3, 4];
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad start date")?;

    for day in 0..30u64 {
        let today = start + Days::new(day);
        let mut introduced = 0;
        for &word_id in &words {
            if load(&db, word_id)?.is_none() && settings.new_items_remaining(introduced) > 0 {
                review(&mut db, &scheduler, &mut streak, word_id, QualityLabel::Good, today)?;
                introduced += 1;
            }
        }
        for word_id in due_words(&db, today)? {
            // word 3 is the hard one and is missed every fourth day
            let label = if word_id == 3 && day % 4 == 0 {
                QualityLabel::Again
            } else {
                QualityLabel::Good
            };
            review(&mut db, &scheduler, &mut streak, word_id, label, today)?;
        }
    }

    println!("streak: {} days", streak.current);
    for word_id in words {
        if let Some(progress) = load(&db, word_id)? {
            println!(
                "word {word_id}: interval {:>3}d, ease {:.2}, seen {}, correct {}, due {}",
                progress.state.interval,
                progress.state.ease_factor,
                progress.times_seen,
                progress.times_correct,
                format_date(progress.next_review)
            );
        }
    }
    Ok(())
}
