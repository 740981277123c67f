//! Trigger scanning (input pre-classification).
//!
//! Inspects the normalized sign text and produces coarse signals that let the
//! parser skip extraction steps that cannot possibly match. A sign without a
//! digit has no clock window; a sign without a weekday-looking word has no day
//! list.
//!
//! ## Design notes
//!
//! - This is a *heuristic* scan. False positives are fine because each
//!   extraction step still has to match its full pattern; false negatives are
//!   not, since they would silently drop information.
//! - Input is already uppercase ASCII (see `normalize.rs`).

bitflags::bitflags! {
    /// Coarse buckets for fast input classification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BucketMask: u32 {
        const HAS_DIGITS  = 1 << 0;
        const HAS_AMPM    = 1 << 1;
        const WEEKDAYISH  = 1 << 2;
        const HAS_EXCEPT  = 1 << 3;
        const HAS_ANYTIME = 1 << 4;
    }
}

/// Input characteristics detected from normalized sign text.
#[derive(Debug, Clone, Copy)]
pub struct TriggerInfo {
    pub buckets: BucketMask,
}

impl TriggerInfo {
    /// Scan `normalized` for coarse buckets.
    pub fn scan(normalized: &str) -> Self {
        let mut buckets = BucketMask::empty();

        if normalized.bytes().any(|b| b.is_ascii_digit()) {
            buckets |= BucketMask::HAS_DIGITS;
        }

        const WEEKDAY_PREFIXES: &[&str] = &["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];
        for word in normalized.split(|c: char| !c.is_ascii_alphanumeric()).filter(|w| !w.is_empty()) {
            if word.ends_with("AM") || word.ends_with("PM") {
                buckets |= BucketMask::HAS_AMPM;
            }
            if WEEKDAY_PREFIXES.iter().any(|p| word.starts_with(p)) {
                buckets |= BucketMask::WEEKDAYISH;
            }
            match word {
                "EXCEPT" => buckets |= BucketMask::HAS_EXCEPT,
                "ANYTIME" => buckets |= BucketMask::HAS_ANYTIME,
                _ => {}
            }
        }

        TriggerInfo { buckets }
    }
}
