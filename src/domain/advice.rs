//! Fixed health messages keyed by the predicted label.

use super::outcome::Label;

/// Messages shown (and spoken) for a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advice {
    /// Headline under "Your Report"
    pub display: &'static str,
    /// Health tip, shown and read aloud
    pub spoken: &'static str,
    /// Extra guidance shown but not spoken
    pub guidance: &'static [&'static str],
}

const HEALTHY: Advice = Advice {
    display: "You are healthy.",
    spoken: "Great news! Keep maintaining a healthy lifestyle to prevent diabetes.",
    guidance: &[],
};

const NOT_HEALTHY: Advice = Advice {
    display: "You are not healthy.",
    spoken: "It is essential to monitor your blood sugar levels regularly, take prescribed medications, and follow a diabetic-friendly diet.",
    guidance: &[
        "Please consult with a healthcare professional for further guidance.",
        "In the meantime, consider making lifestyle changes such as regular exercise and a balanced diet to manage diabetes.",
    ],
};

/// Look up the advice for a label.
#[must_use]
pub fn advise(label: Label) -> Advice {
    match label {
        Label::Healthy => HEALTHY,
        Label::NotHealthy => NOT_HEALTHY,
    }
}

/// Suggestion spoken in answer to the "suggestion" voice command.
#[must_use]
pub fn suggestion(label: Label) -> &'static str {
    match label {
        Label::Healthy => {
            "Healthy tip suggestion: Keep a balanced diet and engage in regular physical activity."
        }
        Label::NotHealthy => {
            "Unhealthy tip suggestion: Consult with a healthcare professional and consider lifestyle changes."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_advice() {
        let advice = advise(Label::Healthy);
        assert_eq!(advice.display, "You are healthy.");
        assert_eq!(
            advice.spoken,
            "Great news! Keep maintaining a healthy lifestyle to prevent diabetes."
        );
        assert!(advice.guidance.is_empty());
    }

    #[test]
    fn test_not_healthy_advice() {
        let advice = advise(Label::NotHealthy);
        assert_eq!(advice.display, "You are not healthy.");
        assert_eq!(
            advice.spoken,
            "It is essential to monitor your blood sugar levels regularly, take prescribed medications, and follow a diabetic-friendly diet."
        );
        assert_eq!(advice.guidance.len(), 2);
        assert!(advice.guidance[0].contains("healthcare professional"));
    }

    #[test]
    fn test_advice_is_stable() {
        assert_eq!(advise(Label::Healthy), advise(Label::Healthy));
        assert_eq!(advise(Label::NotHealthy), advise(Label::NotHealthy));
    }

    #[test]
    fn test_suggestions() {
        assert!(suggestion(Label::Healthy).contains("balanced diet"));
        assert!(suggestion(Label::NotHealthy).contains("Consult with a healthcare professional"));
    }
}
