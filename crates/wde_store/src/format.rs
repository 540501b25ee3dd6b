//! Human readable descriptions built from numeric table fields
//!
//! Every function is total: any input produces one of the documented shapes.
//!
//! | Formula                         | Shapes                                                         |
//! |---------------------------------|----------------------------------------------------------------|
//! | [`cast_time`]`(base, per, min)` | `Instant`, `{base}`, `{base} + {per}/level`, `max({min}, ...)` |
//! | [`duration`]`(base, per, max)`  | `Infinite`, `{base}`, `{base} + {per}/level`, `min({max}, ...)`|
//! | [`radius`]`(base, per, max)`    | `{base} yd`, `{base} yd + {per} yd/level`, `min({max} yd, ...)`|
//! | [`cost`]`(honor, arena, item)`  | non-zero parts joined with `, `, empty when all are zero       |
//!
//! Times are milliseconds rendered by [`pretty_duration`].

const SECOND: i64 = 1000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Render milliseconds as `1 d 2 h 3 min 4 s 5 ms`, skipping zero components
pub fn pretty_duration(milliseconds: i64) -> String {
    if milliseconds == 0 {
        return "0 ms".to_string();
    }

    let mut rest = milliseconds.unsigned_abs();
    let mut parts = Vec::new();
    for (unit, suffix) in [
        (DAY as u64, "d"),
        (HOUR as u64, "h"),
        (MINUTE as u64, "min"),
        (SECOND as u64, "s"),
        (1, "ms"),
    ] {
        let amount = rest / unit;
        rest %= unit;
        if amount != 0 {
            parts.push(format!("{amount} {suffix}"));
        }
    }

    let text = parts.join(" ");
    if milliseconds < 0 {
        format!("-{text}")
    } else {
        text
    }
}

pub fn cast_time(base: i32, per_level: i32, min: i32) -> String {
    let base_text = pretty_duration(base.into());
    if base == 0 && per_level == 0 && min == 0 {
        "Instant".to_string()
    } else if per_level == 0 {
        base_text
    } else if min == 0 {
        format!("{base_text} + {}/level", pretty_duration(per_level.into()))
    } else {
        format!(
            "max({}, {base_text} + {}/level)",
            pretty_duration(min.into()),
            pretty_duration(per_level.into())
        )
    }
}

pub fn duration(base: i32, per_level: i32, max: i32) -> String {
    let base_text = pretty_duration(base.into());
    if base == -1 {
        "Infinite".to_string()
    } else if per_level == 0 {
        base_text
    } else if max == 0 {
        format!("{base_text} + {}/level", pretty_duration(per_level.into()))
    } else {
        format!(
            "min({}, {base_text} + {}/level)",
            pretty_duration(max.into()),
            pretty_duration(per_level.into())
        )
    }
}

pub fn radius(base: f32, per_level: f32, max: f32) -> String {
    if per_level == 0.0 {
        format!("{base} yd")
    } else if max == 0.0 {
        format!("{base} yd + {per_level} yd/level")
    } else {
        format!("min({max} yd, {base} yd + {per_level} yd/level)")
    }
}

pub fn cost(honor: i32, arena_points: i32, item: i32) -> String {
    let mut parts = Vec::with_capacity(3);
    if honor != 0 {
        parts.push(format!("{honor} honor"));
    }
    if arena_points != 0 {
        parts.push(format!("{arena_points} arena points"));
    }
    if item != 0 {
        parts.push(format!("{item} item"));
    }
    parts.join(", ")
}

/// Shorten `text` to `length` characters, marking the cut with `...`
pub fn trim_to_length(text: &str, length: usize) -> String {
    match text.char_indices().nth(length) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{cast_time, cost, duration, pretty_duration, radius, trim_to_length};

    #[test]
    fn golden_values() {
        assert_eq!(duration(-1, 0, 0), "Infinite");
        assert_eq!(cast_time(0, 0, 0), "Instant");
        assert_eq!(radius(5.0, 0.0, 0.0), "5 yd");
        assert_eq!(cost(100, 0, 0), "100 honor");
        assert_eq!(cost(0, 0, 0), "");
    }

    #[test]
    fn pretty_durations() {
        assert_eq!(pretty_duration(0), "0 ms");
        assert_eq!(pretty_duration(1500), "1 s 500 ms");
        assert_eq!(pretty_duration(90 * 60 * 1000), "1 h 30 min");
        assert_eq!(pretty_duration(86_400_000 + 1), "1 d 1 ms");
        assert_eq!(pretty_duration(-2000), "-2 s");
    }

    #[test]
    fn cast_time_shapes() {
        assert_eq!(cast_time(1500, 0, 0), "1 s 500 ms");
        assert_eq!(cast_time(0, 0, 500), "0 ms");
        assert_eq!(cast_time(1000, 100, 0), "1 s + 100 ms/level");
        assert_eq!(cast_time(1000, 100, 500), "max(500 ms, 1 s + 100 ms/level)");
    }

    #[test]
    fn duration_shapes() {
        assert_eq!(duration(0, 0, 0), "0 ms");
        assert_eq!(duration(30000, 0, 0), "30 s");
        assert_eq!(duration(30000, 1000, 0), "30 s + 1 s/level");
        assert_eq!(duration(30000, 1000, 60000), "min(1 min, 30 s + 1 s/level)");
    }

    #[test]
    fn radius_shapes() {
        assert_eq!(radius(2.5, 0.0, 10.0), "2.5 yd");
        assert_eq!(radius(5.0, 1.0, 0.0), "5 yd + 1 yd/level");
        assert_eq!(radius(5.0, 1.0, 8.0), "min(8 yd, 5 yd + 1 yd/level)");
    }

    #[test]
    fn cost_shapes() {
        assert_eq!(cost(0, 250, 0), "250 arena points");
        assert_eq!(cost(0, 0, 3), "3 item");
        assert_eq!(cost(100, 250, 0), "100 honor, 250 arena points");
        assert_eq!(cost(100, 0, 3), "100 honor, 3 item");
        assert_eq!(cost(100, 250, 3), "100 honor, 250 arena points, 3 item");
    }

    #[test]
    fn trimming() {
        assert_eq!(trim_to_length("short", 50), "short");
        assert_eq!(trim_to_length("abcdef", 3), "abc...");
        assert_eq!(trim_to_length("ééé", 2), "éé...");
    }
}
