pub fn time(ns: f64) -> String {
    if ns < 1.0 {
        format!("{:>6} ps", short(ns * 1e3))
    } else if ns < 10f64.powi(3) {
        format!("{:>6} ns", short(ns))
    } else if ns < 10f64.powi(6) {
        format!("{:>6} µs", short(ns / 1e3))
    } else if ns < 10f64.powi(9) {
        format!("{:>6} ms", short(ns / 1e6))
    } else {
        format!("{:>6} s", short(ns / 1e9))
    }
}

pub fn short(n: f64) -> String {
    if n < 10.0 {
        format!("{:.4}", n)
    } else if n < 100.0 {
        format!("{:.3}", n)
    } else if n < 1000.0 {
        format!("{:.2}", n)
    } else if n < 10000.0 {
        format!("{:.1}", n)
    } else {
        format!("{:.0}", n)
    }
}

/// Like `short`, keeping the sign of negative values (thresholds can go below zero)
pub fn signed_short(n: f64) -> String {
    if n < 0.0 {
        format!("\u{2212}{}", short(-n))
    } else {
        short(n)
    }
}

/// Formats an optional statistic, `-` stands for "not available"
pub fn maybe(n: Option<f64>) -> String {
    n.map(signed_short).unwrap_or_else(|| String::from("-"))
}

/// Format a number with thousands separators.
// Based on the corresponding libtest functionality, see
// https://github.com/rust-lang/rust/blob/557359f92512ca88b62a602ebda291f17a953002/library/test/src/bench.rs#L87-L109
fn thousands_sep(mut n: u64, sep: char) -> String {
    use std::fmt::Write;
    let mut output = String::new();
    let mut trailing = false;
    for &pow in &[9, 6, 3, 0] {
        let base = 10_u64.pow(pow);
        if pow == 0 || trailing || n / base != 0 {
            if !trailing {
                write!(output, "{}", n / base).unwrap();
            } else {
                write!(output, "{:03}", n / base).unwrap();
            }
            if pow != 0 {
                output.push(sep);
            }
            trailing = true;
        }
        n %= base;
    }

    output
}

/// Format a count, including thousands-separators.
pub fn integer(n: usize) -> String {
    thousands_sep(n as u64, ',')
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn short_max_len() {
        let mut float = 1.0;
        while float < 999_999.9 {
            let string = short(float);
            println!("{}", string);
            assert!(string.len() <= 6);
            float *= 2.0;
        }
    }

    #[test]
    fn signed_short_keeps_the_sign() {
        assert_eq!(signed_short(-10.0592), "\u{2212}10.059");
        assert_eq!(signed_short(2.5), "2.5000");
        assert_eq!(maybe(None), "-");
    }

    #[test]
    fn integer_thousands_sep() {
        assert_eq!(integer(140_352_319), "140,352,319");
        assert_eq!(integer(7), "7");
    }
}
