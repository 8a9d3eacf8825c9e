//! The cosmetic boot sequence shown before the first prompt.

use tokio::time::Duration;

use crate::session::Session;

const STEPS: [(&str, usize, u64); 4] = [
    ("Initializing OS", 11, 200),
    ("Activating daemon", 9, 100),
    ("Connecting to network", 5, 300),
    ("Launching terminal", 8, 200),
];

/// Play the scripted boot: each step prints its title immediately, animates
/// a run of dots at its own pace, then stamps an `OK` banner. Ends with the
/// welcome line. Fully drains before returning, so the first real prompt
/// never races the animation.
pub async fn boot_sequence(session: &Session) {
    for (title, dots, delay) in STEPS {
        session.out.write_now(title);
        session
            .out
            .write_opts(
                &format!("{} ", ".".repeat(dots)),
                false,
                Duration::from_millis(delay),
            )
            .await;
        session.out.success("OK").await;
    }

    session
        .out
        .write_opts(
            &format!("Welcome back, {}", session.store.display_name()),
            true,
            Duration::from_millis(75),
        )
        .await;
}
