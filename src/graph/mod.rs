mod assets;
mod data;
mod routes;

pub use data::{EdgeColors, GraphData, GraphLink, GraphMetadata, GraphNode, TypeSwatch};
pub use routes::{AppState, router, serve};

use crate::config::Config;
use crate::export::ExportError;
use crate::model::Workflow;
use crate::session::Session;
use serde::Serialize;

const DATA_PLACEHOLDER: &str = "/*__FLOWMAP_DATA__*/null";

#[derive(Serialize)]
struct Embedded<'a> {
    graph: GraphData,
    workflow: &'a Workflow,
}

/// Standalone viewer page with the current workflow inlined.
///
/// The page works offline apart from the D3 script; editing controls are
/// hidden because there is no server to apply them.
pub fn generate_static_html(session: &Session, config: &Config) -> Result<String, ExportError> {
    let embedded = Embedded {
        graph: GraphData::from_session(session, config, config.default_layout)?,
        workflow: session.workflow(),
    };
    let json = serde_json::to_string(&embedded)?.replace("</", "<\\/");
    Ok(assets::INDEX_HTML.replacen(DATA_PLACEHOLDER, &json, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_html_inlines_data() {
        let mut session = Session::new();
        session
            .load_str(r#"{"workflowTasks": [{"taskId": "</script>", "type": "x"}]}"#)
            .unwrap();
        let html = generate_static_html(&session, &Config::default()).unwrap();

        assert!(!html.contains(DATA_PLACEHOLDER));
        assert!(html.contains(r#""workflowTasks""#));
        assert!(html.contains("<\\/script>"));
        assert_eq!(html.matches("</script>").count(), assets::INDEX_HTML.matches("</script>").count());
    }

    #[test]
    fn test_layout_failure_is_reported_not_embedded() {
        use crate::layout::{LayoutError, LayoutKind};
        use crate::loader::LoadReport;
        use crate::model::Task;

        let session = Session::from_report(LoadReport {
            workflow: Workflow::new(vec![
                Task::new("a", "x").on_success(["b"]),
                Task::new("b", "x").on_success(["a"]),
            ]),
            warnings: Vec::new(),
        });
        let config = Config {
            default_layout: LayoutKind::Tree,
            ..Config::default()
        };

        assert!(matches!(
            generate_static_html(&session, &config),
            Err(ExportError::Layout(LayoutError::Cyclic(_)))
        ));
    }

    #[test]
    fn test_placeholder_present_in_page() {
        assert_eq!(assets::INDEX_HTML.matches(DATA_PLACEHOLDER).count(), 1);
    }
}
