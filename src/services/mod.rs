//! Combine orchestration
//!
//! Drives the full run: fetch each source in list order, parse and annotate
//! it, feed it to the merge engine, then render and persist the result. A
//! failing source logs a warning and contributes nothing; the output file is
//! written only when at least one entry survived, so an all-sources-down run
//! never clobbers a previously good playlist with an empty one.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::generator;
use crate::mapping::{self, MappingOptions};
use crate::merge::{MergeEngine, MergeOptions};
use crate::parser::{ParserOptions, parse_playlist};
use crate::sources::SourceFetcher;
use crate::utils::UrlUtils;

/// What a run did, for reporting.
#[derive(Debug, Clone)]
pub struct CombineSummary {
    pub entries_written: usize,
    pub sources_ok: usize,
    pub sources_failed: usize,
    /// False when zero entries were produced and the output was skipped.
    pub output_written: bool,
}

pub struct CombineService {
    config: Config,
}

impl CombineService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self, links: &[String]) -> AppResult<CombineSummary> {
        let fetcher = SourceFetcher::new(self.config.sources.fetch_timeout);
        let mut engine = MergeEngine::new(MergeOptions {
            dedupe: self.config.merge.dedupe,
            group: self.config.merge.group,
            pin_name: self.config.merge.pin.clone(),
            pin_in_groups: self.config.merge.pin_in_groups,
            default_group: self.config.merge.default_group.clone(),
        });
        let parser_options = ParserOptions {
            accept_bare_urls: self.config.merge.accept_bare_urls,
        };
        let mapping_options = MappingOptions {
            group_overrides: self.config.annotate.group_overrides.clone(),
            default_group: self.config.merge.default_group.clone(),
            catchup: self.config.annotate.catchup,
            fold_headers: self.config.annotate.fold_headers,
        };

        let mut sources_ok = 0;
        let mut sources_failed = 0;

        for link in links {
            let source_display = UrlUtils::obfuscate_credentials(link);
            info!("Fetching: {source_display}");
            match fetcher.fetch(link).await {
                Ok(text) => {
                    let mut document = parse_playlist(&text, parser_options);
                    info!(
                        "Parsed {} entries from {source_display}",
                        document.entries.len()
                    );
                    if document.skipped_directives > 0 {
                        debug!(
                            "{} unassociated directives skipped in {source_display}",
                            document.skipped_directives
                        );
                    }
                    mapping::annotate_document(
                        &mut document,
                        link,
                        &mapping_options,
                        self.config.merge.group,
                    );
                    engine.add_document(document);
                    debug!("{} entries accepted so far", engine.accepted());
                    sources_ok += 1;
                }
                Err(e) => {
                    warn!("Failed to fetch/parse {source_display}: {e}");
                    sources_failed += 1;
                }
            }
        }

        let merged = engine.finalize();
        if merged.is_empty() {
            warn!(
                "No entries produced from {} source(s); output not written",
                links.len()
            );
            return Ok(CombineSummary {
                entries_written: 0,
                sources_ok,
                sources_failed,
                output_written: false,
            });
        }

        let entries_written = merged.entry_count();
        let text = generator::render(&merged);
        let path = &self.config.output.file;
        tokio::fs::write(path, text)
            .await
            .map_err(|e| AppError::OutputWrite {
                path: path.clone(),
                source: e,
            })?;

        info!(
            "Wrote {entries_written} entries to {path} (dedupe={}, group={})",
            self.config.merge.dedupe, self.config.merge.group
        );

        Ok(CombineSummary {
            entries_written,
            sources_ok,
            sources_failed,
            output_written: true,
        })
    }
}
