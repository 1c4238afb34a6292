use tracing::{info, warn};
use webbrowser::Browser;

pub const TWEET_INTENT_URL: &str = "https://twitter.com/intent/tweet";
pub const PROMO_URL: &str = "https://nanot1m.github.io/alphabet-typer/";

/// Seconds with two decimals, e.g. `1234` ms -> `"1.23"`.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    format!("{:.2}", elapsed_ms as f64 / 1000.0)
}

pub fn share_message(alphabet_title: &str, elapsed_ms: u64, promo_url: &str) -> String {
    format!(
        "I typed the {} alphabet on my keyboard in {} sec. Test yourself: {}",
        alphabet_title,
        format_elapsed(elapsed_ms),
        promo_url
    )
}

pub fn tweet_url(alphabet_title: &str, elapsed_ms: u64, promo_url: &str) -> String {
    format!(
        "{}?text={}",
        TWEET_INTENT_URL,
        percent_encode(&share_message(alphabet_title, elapsed_ms, promo_url))
    )
}

/// Open the share link in the system browser, if there is one.
pub fn open(url: &str) -> bool {
    if !Browser::is_available() {
        warn!("no browser available for sharing");
        return false;
    }
    match webbrowser::open(url) {
        Ok(()) => {
            info!("share link opened");
            true
        }
        Err(err) => {
            warn!(?err, "failed to open share link");
            false
        }
    }
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
