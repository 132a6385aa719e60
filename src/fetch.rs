use std::io::Write;
use std::sync::Arc;
use tracing::info;

use tripfetch::config::Config;
use tripfetch::pipeline::Pipeline;
use tripfetch::tasks::DownloadFactory;
use tripfetch::transport::HttpTransport;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Download every configured URL, one report line per file on `sink`
///
/// Individual download failures only show up in the report; they never
/// turn into an error here.
pub async fn run<W: Write>(config: Config, sink: &mut W) -> Result<(), AnyError> {
    let transport = Arc::new(HttpTransport::new(&config.http.to_http_config())?);
    let factory = Arc::new(DownloadFactory::new(transport, &config.output.dir));

    let pipeline = Pipeline::new(factory, config.pool.workers)
        .with_handoff_capacity(config.pool.handoff_capacity);

    info!(
        start_year = config.source.start_year,
        end_year = config.source.end_year,
        files = config.source.range().len(),
        workers = pipeline.workers(),
        output_dir = %config.output.dir.display(),
        "Fetching trip data"
    );

    pipeline.run(config.source.urls(), sink).await;

    Ok(())
}

/// Print the URLs a fetch would request
pub fn list<W: Write>(config: &Config, sink: &mut W) -> Result<(), AnyError> {
    for url in config.source.urls() {
        writeln!(sink, "{}", url)?;
    }
    Ok(())
}
