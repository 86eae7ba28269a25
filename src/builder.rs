use crate::{Config, DocumentModel, Result, Session, StoryflowError, config::RuntimeConfig, story::Story};

#[derive(Default)]
pub struct SessionBuilder {
    runtime: RuntimeConfig,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(
        mut self,
        config: &Config,
    ) -> Self {
        self.runtime = config.runtime;
        self
    }

    pub fn max_template_depth(
        mut self,
        n: usize,
    ) -> Self {
        self.runtime.max_template_depth = n;
        self
    }

    pub fn max_auto_steps(
        mut self,
        n: usize,
    ) -> Self {
        self.runtime.max_auto_steps = n;
        self
    }

    /// Starts a preview session on a copy of the document.
    pub fn build(
        &self,
        model: &DocumentModel,
    ) -> Result<Session> {
        if self.runtime.max_auto_steps == 0 {
            return Err(StoryflowError::Config("max_auto_steps must be greater than 0".to_string()));
        }
        let story = Story::try_from(model)?;
        Ok(Session::new(story, model.variables.clone(), self.runtime))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_build_session() {
        let model = DocumentModel::from_value(json!({
            "nodes": [{"id": "1", "type": "start"}, {"id": "2", "type": "end"}],
            "edges": [{"id": "e1", "source": "1", "target": "2"}],
            "variables": [{"name": "hp", "type": "number", "defaultValue": 3}]
        }))
        .unwrap();

        let config = Config::load_from_str("[runtime]\nmax_template_depth = 2\n").unwrap();
        let session = SessionBuilder::new().config(&config).build(&model).unwrap();
        assert_eq!(session.variables().max_depth(), 2);
        assert_eq!(session.variables().get("hp"), Some(&json!(3)));
        assert_eq!(session.current_node_id(), "1");
        assert_eq!(session.id().len(), 21);
    }

    #[test]
    fn test_build_rejects_bad_documents() {
        let model = DocumentModel::from_value(json!({"nodes": [{"id": "1", "type": "plot"}], "edges": []})).unwrap();
        assert!(matches!(SessionBuilder::new().build(&model), Err(StoryflowError::Document(_))));

        let model = DocumentModel::from_value(json!({"nodes": [{"id": "1", "type": "start"}], "edges": []})).unwrap();
        assert!(matches!(SessionBuilder::new().max_auto_steps(0).build(&model), Err(StoryflowError::Config(_))));
    }
}
