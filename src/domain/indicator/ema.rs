//! Exponential Moving Average.
//!
//! k = 2/(span+1), seeded with the first value, then
//! EMA[i] = x[i]*k + EMA[i-1]*(1-k). No warmup: every index has a value.

pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return out;
    };

    let k = smoothing_factor(span);
    let mut ema = first;
    out.push(ema);
    for &x in &values[1..] {
        ema = x * k + ema * (1.0 - k);
        out.push(ema);
    }
    out
}

pub fn smoothing_factor(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_seed_is_first_value() {
        let out = ema(&[10.0, 20.0, 30.0], 3);
        assert!((out[0] - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_span_1_tracks_input() {
        let out = ema(&[10.0, 20.0, 30.0], 1);
        assert_eq!(out, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn ema_recursive_calculation() {
        let out = ema(&[10.0, 20.0, 30.0, 40.0], 3);
        let k = 0.5;

        let e1 = 20.0 * k + 10.0 * (1.0 - k);
        let e2 = 30.0 * k + e1 * (1.0 - k);
        let e3 = 40.0 * k + e2 * (1.0 - k);

        assert!((out[1] - e1).abs() < f64::EPSILON);
        assert!((out[2] - e2).abs() < f64::EPSILON);
        assert!((out[3] - e3).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_equal_prices() {
        let out = ema(&[100.0; 5], 4);
        for v in out {
            assert!((v - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_empty() {
        assert!(ema(&[], 3).is_empty());
    }

    #[test]
    fn ema_smoothing_factor() {
        assert!((smoothing_factor(10) - 2.0 / 11.0).abs() < f64::EPSILON);
    }
}
