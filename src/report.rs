/// Band of a student's overall average on the 0-20 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mention {
    Excellent,
    Good,
    FairlyGood,
    Passing,
    Failing,
}

impl Mention {
    pub fn for_average(avg: f64) -> Mention {
        if avg >= 16.0 {
            Mention::Excellent
        } else if avg >= 14.0 {
            Mention::Good
        } else if avg >= 12.0 {
            Mention::FairlyGood
        } else if avg >= 10.0 {
            Mention::Passing
        } else {
            Mention::Failing
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mention::Excellent => "excellent",
            Mention::Good => "good",
            Mention::FairlyGood => "fairly good",
            Mention::Passing => "passing",
            Mention::Failing => "failing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageReport {
    pub mean: f64,
    pub count: usize,
    pub mention: Mention,
}

impl AverageReport {
    pub fn rounded(&self) -> f64 {
        round_2_decimals(self.mean)
    }
}

/// `None` when there is nothing to average.
pub fn average(grades: &[f64]) -> Option<AverageReport> {
    if grades.is_empty() {
        return None;
    }
    let mean = grades.iter().sum::<f64>() / grades.len() as f64;
    Some(AverageReport {
        mean,
        count: grades.len(),
        mention: Mention::for_average(mean),
    })
}

pub fn round_2_decimals(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
