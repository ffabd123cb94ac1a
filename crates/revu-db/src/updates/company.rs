//! Company update builder.

#[derive(Debug, Clone, Default)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub uen: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub image: Option<Option<String>>,
}

#[derive(Default)]
pub struct CompanyUpdateBuilder(CompanyUpdate);

impl CompanyUpdateBuilder {
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
    pub fn uen(mut self, val: Option<String>) -> Self {
        self.0.uen = Some(val);
        self
    }

    #[must_use]
    pub fn description(mut self, val: Option<String>) -> Self {
        self.0.description = Some(val);
        self
    }

    #[must_use]
    pub fn url(mut self, val: Option<String>) -> Self {
        self.0.url = Some(val);
        self
    }

    #[must_use]
    pub fn image(mut self, val: Option<String>) -> Self {
        self.0.image = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> CompanyUpdate {
        self.0
    }
}
