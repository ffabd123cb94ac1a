//! Aspect update builder.

#[derive(Debug, Clone, Default)]
pub struct AspectUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

#[derive(Default)]
pub struct AspectUpdateBuilder(AspectUpdate);

impl AspectUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    #[must_use]
    pub fn description(mut self, val: Option<String>) -> Self {
        self.0.description = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> AspectUpdate {
        self.0
    }
}
