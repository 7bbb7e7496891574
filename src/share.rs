//! Share-intent URL construction. Pure string work, no network.

/// Tweet-intent URL announcing a finished run.
pub fn share_url(name: &str, score: u32, best: u32) -> String {
    let text = format!(
        "{} - Flappy Dopamine score: {}. Personal best: {}.",
        name, score, best
    );
    format!(
        "https://twitter.com/intent/tweet?text={}",
        urlencoding::encode(&text)
    )
}
