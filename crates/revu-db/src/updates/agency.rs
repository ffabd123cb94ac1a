//! Agency update builder.

#[derive(Debug, Clone, Default)]
pub struct AgencyUpdate {
    pub name: Option<String>,
    pub acronym: Option<Option<String>>,
    pub kind: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub phone_number: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub image: Option<Option<String>>,
}

#[derive(Default)]
pub struct AgencyUpdateBuilder(AgencyUpdate);

impl AgencyUpdateBuilder {
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
    pub fn kind(mut self, val: Option<String>) -> Self {
        self.0.kind = Some(val);
        self
    }

    #[must_use]
    pub fn description(mut self, val: Option<String>) -> Self {
        self.0.description = Some(val);
        self
    }

    #[must_use]
    pub fn phone_number(mut self, val: Option<String>) -> Self {
        self.0.phone_number = Some(val);
        self
    }

    #[must_use]
    pub fn email(mut self, val: Option<String>) -> Self {
        self.0.email = Some(val);
        self
    }

    #[must_use]
    pub fn image(mut self, val: Option<String>) -> Self {
        self.0.image = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> AgencyUpdate {
        self.0
    }
}
