text_enum! {
    Priority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Priority {
    /// Sort weight; higher sorts first.
    pub fn rank(priority: Option<Priority>) -> u8 {
        match priority {
            Some(Priority::High) => 3,
            Some(Priority::Medium) => 2,
            Some(Priority::Low) => 1,
            None => 0,
        }
    }
}
