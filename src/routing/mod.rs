//! Routing module
//!
//! Declares the handlers the service knows about and the fixed route table
//! mapping request paths onto them.

mod matcher;

pub use matcher::{Route, RouteEntry, Router};

/// Template rendered for the landing page
pub const INDEX_TEMPLATE: &str = "landingpage/index.html";

/// External translation API the redirect handler points at
pub const TRANSLATE_API_URL: &str = "https://translate.yandex.net/api/v1/tr/translate";

/// Script file served verbatim from the asset directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptAsset {
    pub name: &'static str,
    /// Path relative to `paths.asset_dir`
    pub path: &'static str,
}

pub const LIB_JS: ScriptAsset = ScriptAsset {
    name: "lib",
    path: "yandex/lib.js",
};

pub const TR_URL_JS: ScriptAsset = ScriptAsset {
    name: "tr-url",
    path: "yandex/tr-url.js",
};

/// What a matched route does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Render a fixed template
    Index { template: &'static str },
    /// Serve a script file's bytes
    Script(ScriptAsset),
    /// 302 to a fixed URL, ignoring the request
    Redirect { target: &'static str },
}

impl Handler {
    /// Short label for logs
    pub fn describe(&self) -> String {
        match self {
            Self::Index { template } => format!("index ({template})"),
            Self::Script(asset) => format!("script {} ({})", asset.name, asset.path),
            Self::Redirect { target } => format!("redirect -> {target}"),
        }
    }
}

/// The landing page route table, in priority order
pub fn landing_routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry::new(
            "^$",
            Handler::Index {
                template: INDEX_TEMPLATE,
            },
        )
        .named("landingpage"),
        RouteEntry::new(r"^v1\.98/js/lib\.js", Handler::Script(LIB_JS)),
        RouteEntry::new(r"^v1\.98/js/tr-url\.js", Handler::Script(TR_URL_JS)),
        RouteEntry::new(
            "^api/v1/tr/translate",
            Handler::Redirect {
                target: TRANSLATE_API_URL,
            },
        ),
    ]
}
