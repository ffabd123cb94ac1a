//! Comment update builder.

#[derive(Debug, Clone, Default)]
pub struct CommentUpdate {
    pub content: Option<String>,
}

#[derive(Default)]
pub struct CommentUpdateBuilder(CommentUpdate);

impl CommentUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn content(mut self, val: impl Into<String>) -> Self {
        self.0.content = Some(val.into());
        self
    }

    #[must_use]
    pub fn build(self) -> CommentUpdate {
        self.0
    }
}
