use chrono::NaiveDate;

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub(crate) trait TestHelper {
    fn assert_approx_eq(&self, expected: impl AsRef<[f64]>);
}

impl TestHelper for [f64] {
    #[track_caller]
    fn assert_approx_eq(&self, expected: impl AsRef<[f64]>) {
        let expected = expected.as_ref();
        assert_eq!(self.len(), expected.len(), "length mismatch");
        for (i, (a, b)) in self.iter().zip(expected).enumerate() {
            assert!((a - b).abs() < 1e-9, "index {i}: {a} != {b}");
        }
    }
}
