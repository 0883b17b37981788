use chrono::NaiveDate;
use sm2::{
    FirstReviewPolicy, ItemProgress, MemoryState, QualityLabel, Scheduler, format_date, today_utc,
};

fn print_preview(scheduler: &Scheduler, state: &MemoryState) {
    let preview = scheduler.preview(state);
    for (label, interval) in preview.iter() {
        println!("{label:>5}: {interval}");
    }
}

fn schedule_new_word(scheduler: &Scheduler, today: NaiveDate) -> ItemProgress {
    // A word with no progress record is always shown again tomorrow
    let progress = scheduler.review_item(FirstReviewPolicy::Word, None, QualityLabel::Hard, today);

    println!("Next review due: {}", format_date(progress.next_review));
    println!("Memory state: {:?}", progress.state);
    progress
}

fn schedule_existing_word(scheduler: &Scheduler, progress: &ItemProgress, today: NaiveDate) {
    println!("Buttons for {:?}:", progress.state);
    print_preview(scheduler, &progress.state);

    // Assume the learner pressed `good`
    let progress = scheduler.review_item(
        FirstReviewPolicy::Word,
        Some(progress),
        QualityLabel::Good,
        today,
    );
    println!("Next review due: {}", format_date(progress.next_review));
    println!(
        "Memory state: {:?} ({})",
        progress.state,
        progress.mastery(scheduler)
    );
}

fn schedule_new_sentence(scheduler: &Scheduler, today: NaiveDate) {
    // A sentence missed on first sight stays due today
    let outcome = scheduler.first_review(FirstReviewPolicy::Sentence, QualityLabel::Again, today);
    println!("Next review due: {}", outcome.next_review_string());
    println!("Memory state: {:?}", outcome.state);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = Scheduler::default();
    let today = today_utc();

    println!("Scheduling a new word:");
    let progress = schedule_new_word(&scheduler, today);

    println!("\nScheduling the same word a day later:");
    let tomorrow = today.succ_opt().ok_or("date out of range")?;
    schedule_existing_word(&scheduler, &progress, tomorrow);

    println!("\nScheduling a mature word:");
    let mature = ItemProgress {
        state: MemoryState {
            ease_factor: 2.5,
            interval: 38,
            repetition: 4,
        },
        next_review: today,
        times_seen: 6,
        times_correct: 5,
        last_review: Some(today - chrono::Days::new(38)),
    };
    schedule_existing_word(&scheduler, &mature, today);

    println!("\nScheduling a new sentence:");
    schedule_new_sentence(&scheduler, today);

    Ok(())
}
