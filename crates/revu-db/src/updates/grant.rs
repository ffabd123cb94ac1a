//! Grant update builder.

#[derive(Debug, Clone, Default)]
pub struct GrantUpdate {
    pub name: Option<String>,
    pub acronym: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

#[derive(Default)]
pub struct GrantUpdateBuilder(GrantUpdate);

impl GrantUpdateBuilder {
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
    pub fn acronym(mut self, val: Option<String>) -> Self {
        self.0.acronym = Some(val);
        self
    }

    #[must_use]
    pub fn description(mut self, val: Option<String>) -> Self {
        self.0.description = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> GrantUpdate {
        self.0
    }
}
