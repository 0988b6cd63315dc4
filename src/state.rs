use crate::config::AppConfig;
use crate::sink::{build_sink, RecordSink};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sink: Arc<dyn RecordSink>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let sink = build_sink(&config)?;
        Ok(Self { config, sink })
    }

    #[cfg(test)]
    pub fn with_sink(sink: Arc<dyn RecordSink>) -> Self {
        use crate::config::{SheetConfig, SinkBackend};
        use crate::signup::theme::Theme;

        let config = Arc::new(AppConfig {
            backend: SinkBackend::LocalFile,
            sheet: SheetConfig {
                sheet_name: "test".into(),
                service_account_file: None,
            },
            csv_path: "unused.csv".into(),
            theme: Theme::Navy,
        });
        Self { config, sink }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::with_sink(Arc::new(crate::sink::testing::RecordingSink::default()))
    }
}
