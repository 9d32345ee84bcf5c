use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound for inbound SPARQL request bodies.
pub const MAX_SPARQL_BODY_SIZE: usize = 1024 * 1024 * 8; // 8MB
/// Timeout applied to every backend call.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Static association between a logical dataset name, its backend URL and
/// its interactive query editor route.
///
/// Bindings are built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct EndpointBinding {
    /// Logical dataset name, also the path segment the gateway dispatches on.
    pub name: String,
    /// Base URL of the SPARQL endpoint this binding forwards to.
    pub backend_url: String,
    /// Route of the interactive query editor for this binding.
    pub ui_route: String,
    /// Human-readable title shown on the query editor page.
    pub title: String,
}

/// Holds the configuration for a gateway server.
///
/// Shared read-only across all requests.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The IP address or DNS name that the socket binds to.
    pub bind: String,
    /// Public host name of the gateway, shown on the rendered pages.
    pub base_url: String,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// The endpoint binding table.
    pub bindings: Vec<EndpointBinding>,
}

impl ServerConfig {
    /// Builds the configuration from the process environment.
    ///
    /// This is the only place that reads environment variables; every
    /// component receives the resulting value explicitly.
    pub fn from_env(bind: String) -> Self {
        let base_url =
            env::var("SPARQL_BASE_URL").unwrap_or_else(|_| "sparql.opencitations.net".to_owned());
        let index_url = env::var("SPARQL_ENDPOINT_INDEX")
            .unwrap_or_else(|_| "http://qlever-service.default.svc.cluster.local:7011".to_owned());
        let meta_url = env::var("SPARQL_ENDPOINT_META").unwrap_or_else(|_| {
            "http://virtuoso-service.default.svc.cluster.local:8890/sparql".to_owned()
        });
        let static_dir = env::var("SPARQL_STATIC_DIR")
            .map_or_else(|_| PathBuf::from("static"), PathBuf::from);

        Self {
            bind,
            base_url,
            static_dir,
            bindings: vec![
                EndpointBinding {
                    name: "index".to_owned(),
                    backend_url: index_url,
                    ui_route: "/index".to_owned(),
                    title: "OpenCitations Index".to_owned(),
                },
                EndpointBinding {
                    name: "meta".to_owned(),
                    backend_url: meta_url,
                    ui_route: "/meta".to_owned(),
                    title: "OpenCitations Meta".to_owned(),
                },
            ],
        }
    }

    /// Looks up a binding by its logical dataset name.
    pub fn binding(&self, name: &str) -> Option<&EndpointBinding> {
        self.bindings.iter().find(|b| b.name == name)
    }
}
