//! Spinner for in-flight requests

use serde::Serialize;

/// Spinner size variants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum SpinnerSize {
    /// Small spinner (14px)
    Small,
    /// Medium spinner (18px)
    #[default]
    Medium,
    /// Large spinner (24px)
    Large,
}

impl SpinnerSize {
    pub fn diameter(&self) -> f32 {
        match self {
            SpinnerSize::Small => 14.0,
            SpinnerSize::Medium => 18.0,
            SpinnerSize::Large => 24.0,
        }
    }

    pub fn border_width(&self) -> f32 {
        match self {
            SpinnerSize::Small => 2.0,
            SpinnerSize::Medium => 2.0,
            SpinnerSize::Large => 3.0,
        }
    }
}

/// Loading indicator
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Spinner {
    size: SpinnerSize,
    label: String,
    duration_ms: u32,
    class_name: Option<String>,
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            size: SpinnerSize::default(),
            label: "Loading".to_string(),
            duration_ms: 1000,
            class_name: None,
        }
    }
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, size: SpinnerSize) -> Self {
        self.size = size;
        self
    }

    /// Accessible label (default "Loading")
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Time for one rotation
    pub fn duration_ms(mut self, ms: u32) -> Self {
        self.duration_ms = ms;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn diameter(&self) -> f32 {
        self.size.diameter()
    }

    pub fn role(&self) -> &'static str {
        "status"
    }

    pub fn aria_label(&self) -> &str {
        &self.label
    }

    pub fn class(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Rotation in degrees at `elapsed_ms`
    pub fn rotation_at(&self, elapsed_ms: u64) -> f32 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        let phase = (elapsed_ms % self.duration_ms as u64) as f32 / self.duration_ms as f32;
        phase * 360.0
    }
}

/// Create a spinner
pub fn spinner() -> Spinner {
    Spinner::new()
}
