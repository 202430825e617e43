use crate::{
    cli::OutputFormat,
    config::AppConfig,
    error::{CliError, Result},
    output::{ChannelRow, OutputManager, write_output},
    select::{filter_format, pick, rank_streams},
};
use indicatif::{ProgressBar, ProgressStyle};
use onetv_parser::{
    extractor::{
        ProxyConfig, factory::ExtractorFactory, factory_with_proxy,
        platform_extractor::PlatformExtractor, platforms::onetv::Channel,
    },
    media::{MediaInfo, StreamInfo},
};
use std::{path::Path, time::Duration};
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

pub struct ExtractOptions<'a> {
    pub url: &'a str,
    pub extras: Option<&'a str>,
    pub output_file: Option<&'a Path>,
    pub quality: Option<&'a str>,
    pub format: Option<&'a str>,
    pub auto_select: bool,
    pub list: bool,
    pub include_extras: bool,
    pub output_format: OutputFormat,
    pub timeout: Duration,
    pub retries: u32,
}

pub struct CommandExecutor {
    config: AppConfig,
    extractor_factory: ExtractorFactory,
}

impl CommandExecutor {
    pub fn new(config: AppConfig) -> Result<Self> {
        let proxy_config = config.default_proxy.as_ref().map(|url| ProxyConfig {
            url: url.clone(),
            username: config.default_proxy_username.clone(),
            password: config.default_proxy_password.clone(),
        });

        let extractor_factory = factory_with_proxy(proxy_config)?;
        Ok(Self {
            config,
            extractor_factory,
        })
    }

    pub fn new_with_proxy(
        config: AppConfig,
        proxy_url: Option<String>,
        proxy_username: Option<String>,
        proxy_password: Option<String>,
    ) -> Result<Self> {
        let proxy_config = proxy_url.map(|url| ProxyConfig {
            url,
            username: proxy_username,
            password: proxy_password,
        });

        let extractor_factory = factory_with_proxy(proxy_config)?;
        Ok(Self {
            config,
            extractor_factory,
        })
    }

    pub async fn extract_single(&self, options: ExtractOptions<'_>) -> Result<()> {
        if !self.extractor_factory.can_handle(options.url) {
            return Err(CliError::invalid_input(format!(
                "{} is not a supported channel page, see `onetv channels`",
                options.url
            )));
        }

        let pb = self.create_progress_bar("Extracting...");
        let result = self
            .extract_with_retry(options.url, options.extras, options.timeout, options.retries)
            .await;
        pb.finish_and_clear();

        let (mut media_info, extractor) = result?;
        if media_info.streams.is_empty() {
            return Err(CliError::no_streams_found());
        }

        let mut streams = std::mem::take(&mut media_info.streams);
        if let Some(pattern) = options.format {
            streams = filter_format(streams, pattern)?;
            if streams.is_empty() {
                return Err(CliError::no_matching_stream());
            }
        }
        rank_streams(&mut streams, |quality| extractor.stream_weight(quality));

        let quality = options.quality.or(self.config.default_quality.as_deref());
        let auto_select = options.auto_select || self.config.auto_select;
        let selected = match quality {
            Some(selector) => {
                Some(pick(&streams, selector).ok_or_else(CliError::no_matching_stream)?)
            }
            None if auto_select || streams.len() == 1 => Some(streams.len() - 1),
            None if options.list => None,
            None => Some(self.interactive_select_stream(&streams)?),
        };
        if let Some(index) = selected {
            debug!("Selected stream: {}", streams[index]);
        }

        media_info.streams = streams;
        let selected_stream = selected.map(|index| &media_info.streams[index]);

        let output_manager = OutputManager::new(self.config.colored_output);
        let output = output_manager.format_media_info(
            &media_info,
            selected_stream,
            &options.output_format,
            options.include_extras,
            options.list,
        )?;

        write_output(&output, options.output_file)?;
        Ok(())
    }

    pub fn list_channels(&self, output_format: &OutputFormat) -> Result<()> {
        let rows: Vec<ChannelRow> = Channel::ALL
            .iter()
            .map(|channel| ChannelRow {
                name: channel.display_name(),
                id: channel.canonical_id(),
                site: channel.site_name(),
            })
            .collect();
        let patterns: Vec<&str> = self
            .extractor_factory
            .supported_platforms()
            .map(|(_, pattern)| pattern)
            .collect();

        let output_manager = OutputManager::new(self.config.colored_output);
        let output = output_manager.format_channels(&rows, &patterns, output_format)?;
        write_output(&output, None)
    }

    fn create_progress_bar(&self, message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(500));
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map(|style| style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "))
        {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb
    }

    async fn extract_with_retry(
        &self,
        url: &str,
        extras: Option<&str>,
        timeout_duration: Duration,
        retries: u32,
    ) -> Result<(MediaInfo, Box<dyn PlatformExtractor>)> {
        let extras_json: Option<serde_json::Value> =
            extras.map(serde_json::from_str::<serde_json::Value>).transpose()?;
        let mut last_error = None;

        for attempt in 0..=retries {
            match timeout(timeout_duration, async {
                let extractor = self
                    .extractor_factory
                    .create_extractor(url, extras_json.clone())?;
                let media_info = extractor.extract().await?;
                Ok::<_, CliError>((media_info, extractor))
            })
            .await
            {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => last_error = Some(e),
                Err(_) => last_error = Some(CliError::timeout(timeout_duration.as_secs())),
            }

            if attempt < retries {
                let delay = Duration::from_millis(1000 * (1 << attempt.min(6)));
                if let Some(e) = &last_error {
                    warn!("Attempt {} failed: {}, retrying in {:?}", attempt + 1, e, delay);
                }
                sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| CliError::timeout(timeout_duration.as_secs())))
    }

    /// Prompts for a stream, best first. Returns an index into `ranked`.
    fn interactive_select_stream(&self, ranked: &[StreamInfo]) -> Result<usize> {
        if ranked.is_empty() {
            return Err(CliError::no_streams_found());
        }

        #[cfg(feature = "interactive")]
        {
            let options: Vec<String> = ranked
                .iter()
                .rev()
                .map(|stream| {
                    if stream.bitrate > 0 {
                        format!(
                            "{} - {} ({} kbps)",
                            stream.quality, stream.stream_format, stream.bitrate
                        )
                    } else {
                        format!("{} - {}", stream.quality, stream.stream_format)
                    }
                })
                .collect();

            let selection = inquire::Select::new("Select a stream:", options)
                .raw_prompt()
                .map_err(|_| CliError::user_cancelled())?;

            Ok(ranked.len() - 1 - selection.index)
        }

        #[cfg(not(feature = "interactive"))]
        {
            // Fallback: the best stream if interactive feature is disabled
            Ok(ranked.len() - 1)
        }
    }
}
