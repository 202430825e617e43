use crate::{cli::OutputFormat, error::Result};
#[cfg(feature = "colored-output")]
use colored::*;
use onetv_parser::media::{MediaInfo, StreamInfo};
use serde::Serialize;
use std::borrow::Cow;
use std::io::Write;
#[cfg(feature = "table-output")]
use tabled::{Table, Tabled, settings::Style};

/// One line of the channel listing.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "table-output", derive(Tabled))]
pub struct ChannelRow {
    pub name: &'static str,
    pub id: &'static str,
    pub site: &'static str,
}

pub struct OutputManager {
    colored: bool,
}

impl OutputManager {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// `media_info.streams` is expected ranked from worst to best.
    pub fn format_media_info(
        &self,
        media_info: &MediaInfo,
        stream_info: Option<&StreamInfo>,
        format: &OutputFormat,
        include_extras: bool,
        list_streams: bool,
    ) -> Result<String> {
        match format {
            OutputFormat::Pretty => {
                self.format_pretty(media_info, stream_info, include_extras, list_streams)
            }
            OutputFormat::Json => {
                self.format_json(media_info, stream_info, include_extras, list_streams, true)
            }
            OutputFormat::JsonCompact => {
                self.format_json(media_info, stream_info, include_extras, list_streams, false)
            }
            #[cfg(feature = "table-output")]
            OutputFormat::Table => self.format_table(media_info, stream_info, list_streams),
            #[cfg(not(feature = "table-output"))]
            OutputFormat::Table => {
                // Fallback to pretty format when table feature is disabled
                self.format_pretty(media_info, stream_info, include_extras, list_streams)
            }
            OutputFormat::Csv => self.format_csv(media_info, stream_info, list_streams),
        }
    }

    pub fn format_channels(
        &self,
        rows: &[ChannelRow],
        patterns: &[&str],
        format: &OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "channels": rows,
                "url_patterns": patterns,
            }))?),
            OutputFormat::JsonCompact => Ok(serde_json::to_string(&serde_json::json!({
                "channels": rows,
                "url_patterns": patterns,
            }))?),
            #[cfg(feature = "table-output")]
            OutputFormat::Table => Ok(format!(
                "{}\n",
                Table::new(rows).with(Style::modern())
            )),
            OutputFormat::Csv => {
                let mut output = String::from("name,id,site\n");
                for row in rows {
                    output.push_str(&format!(
                        "\"{}\",{},{}\n",
                        Self::escape_csv(row.name),
                        row.id,
                        row.site
                    ));
                }
                Ok(output)
            }
            _ => {
                let mut output = String::new();
                output.push_str(&self.colorize("Supported Channels:", &Color::Green, true));
                output.push('\n');
                for row in rows {
                    output.push_str(&format!(
                        "  {} ({}) - {}\n",
                        self.colorize(row.name, &Color::Cyan, true),
                        row.id,
                        self.colorize(row.site, &Color::Blue, false)
                    ));
                }
                for pattern in patterns {
                    output.push_str(&format!(
                        "\n{}: {}\n",
                        self.colorize("URL pattern", &Color::Yellow, false),
                        pattern
                    ));
                }
                Ok(output)
            }
        }
    }

    fn format_pretty(
        &self,
        media_info: &MediaInfo,
        stream_info: Option<&StreamInfo>,
        include_extras: bool,
        list_streams: bool,
    ) -> Result<String> {
        let mut output = String::new();

        // Media Information
        output.push_str(&self.colorize("Media Information:", &Color::Green, true));
        output.push('\n');

        for (key, value) in [
            ("Title", media_info.title.as_str()),
            ("Channel", media_info.channel.as_str()),
            ("Live", if media_info.is_live { "true" } else { "false" }),
        ] {
            output.push_str(&format!(
                "  {}: {}\n",
                self.colorize(key, &Color::Yellow, false),
                self.colorize(value, &Color::Cyan, false)
            ));
        }
        output.push_str(&format!(
            "  {}: {}\n",
            self.colorize("Page URL", &Color::Yellow, false),
            self.colorize(&media_info.site_url, &Color::Blue, false)
        ));

        if list_streams {
            output.push('\n');
            output.push_str(&self.colorize("Available Streams:", &Color::Green, true));
            output.push('\n');
            for stream in &media_info.streams {
                let marker = if stream_info.is_some_and(|s| std::ptr::eq(s, stream)) {
                    "*"
                } else {
                    " "
                };
                output.push_str(&format!(
                    " {} {} {}\n",
                    marker,
                    self.colorize(&format!("{:<14}", stream.quality), &Color::Cyan, false),
                    stream
                ));
            }
        }

        // Stream Information
        if let Some(stream) = stream_info {
            output.push('\n');
            output.push_str(&self.colorize("Selected Stream Details:", &Color::Green, true));
            output.push('\n');

            let fields: [(&str, Cow<str>); 7] = [
                ("Format", Cow::Owned(stream.stream_format.to_string())),
                ("Quality", Cow::Borrowed(&stream.quality)),
                ("URL", Cow::Borrowed(&stream.url)),
                ("Bitrate", Cow::Owned(format!("{} kbps", stream.bitrate))),
                ("Media Format", Cow::Owned(stream.media_format.to_string())),
                ("Codec", Cow::Borrowed(&stream.codec)),
                ("FPS", Cow::Owned(stream.fps.to_string())),
            ];
            for (key, value) in fields {
                let color = if key == "URL" { Color::Blue } else { Color::Cyan };
                output.push_str(&format!(
                    "  {}: {}\n",
                    self.colorize(key, &Color::Yellow, false),
                    self.colorize(&value, &color, false)
                ));
            }

            if include_extras {
                if let Some(extras_obj) = stream
                    .extras
                    .as_ref()
                    .and_then(|e| e.as_object())
                    .filter(|m| !m.is_empty())
                {
                    output.push_str(&format!(
                        "  {}:\n",
                        self.colorize("Extras", &Color::Yellow, false)
                    ));
                    for (key, value) in extras_obj {
                        output.push_str(&format!(
                            "    {}: {}\n",
                            self.colorize(key, &Color::Green, false),
                            self.colorize(&value.to_string(), &Color::Cyan, false)
                        ));
                    }
                }
            }
        }

        // Request headers a player needs to replay the stream
        if include_extras {
            if let Some(extras) = media_info.extras.as_ref().filter(|e| !e.is_empty()) {
                output.push('\n');
                output.push_str(&self.colorize("Media Extras:", &Color::Green, true));
                output.push('\n');
                let mut entries: Vec<_> = extras.iter().collect();
                entries.sort();
                for (key, value) in entries {
                    output.push_str(&format!(
                        "  {}: {}\n",
                        self.colorize(key, &Color::Yellow, false),
                        self.colorize(value, &Color::Cyan, false)
                    ));
                }
            }
        }

        Ok(output)
    }

    fn format_json(
        &self,
        media_info: &MediaInfo,
        stream_info: Option<&StreamInfo>,
        include_extras: bool,
        list_streams: bool,
        pretty: bool,
    ) -> Result<String> {
        let mut output = serde_json::json!({
            "media": {
                "title": &media_info.title,
                "channel": &media_info.channel,
                "is_live": media_info.is_live,
                "site_url": &media_info.site_url,
            }
        });

        if include_extras {
            if let Some(extras) = media_info.extras.as_ref().filter(|e| !e.is_empty()) {
                output["media"]["extras"] = serde_json::to_value(extras)?;
            }
        }

        if list_streams {
            let streams = media_info
                .streams
                .iter()
                .map(|s| Self::stream_json(s, include_extras))
                .collect();
            output["streams"] = serde_json::Value::Array(streams);
        }

        if let Some(stream) = stream_info {
            output["stream"] = Self::stream_json(stream, include_extras);
        }

        let result = if pretty {
            serde_json::to_string_pretty(&output)?
        } else {
            serde_json::to_string(&output)?
        };

        Ok(result)
    }

    fn stream_json(stream: &StreamInfo, include_extras: bool) -> serde_json::Value {
        let mut stream_data = serde_json::json!({
            "stream_format": stream.stream_format.to_string(),
            "quality": &stream.quality,
            "url": &stream.url,
            "bitrate": stream.bitrate,
            "media_format": stream.media_format.to_string(),
            "codec": &stream.codec,
            "fps": stream.fps,
        });

        if include_extras {
            if let Some(extras) = &stream.extras {
                stream_data["extras"] = extras.clone();
            }
        }
        stream_data
    }

    #[cfg(feature = "table-output")]
    fn format_table(
        &self,
        media_info: &MediaInfo,
        stream_info: Option<&StreamInfo>,
        list_streams: bool,
    ) -> Result<String> {
        #[derive(Tabled)]
        struct TableRow<'a> {
            property: &'a str,
            value: Cow<'a, str>,
        }

        #[derive(Tabled)]
        struct StreamRow<'a> {
            quality: &'a str,
            format: String,
            bitrate: u64,
            codec: &'a str,
            url: &'a str,
        }

        let mut rows = vec![
            TableRow {
                property: "Title",
                value: Cow::Borrowed(&media_info.title),
            },
            TableRow {
                property: "Channel",
                value: Cow::Borrowed(&media_info.channel),
            },
            TableRow {
                property: "Live",
                value: Cow::Owned(media_info.is_live.to_string()),
            },
        ];

        if let Some(stream) = stream_info {
            rows.push(TableRow {
                property: "Stream Format",
                value: Cow::Owned(stream.stream_format.to_string()),
            });
            rows.push(TableRow {
                property: "Quality",
                value: Cow::Borrowed(&stream.quality),
            });
            rows.push(TableRow {
                property: "Stream URL",
                value: Cow::Borrowed(&stream.url),
            });
            rows.push(TableRow {
                property: "Bitrate",
                value: Cow::Owned(format!("{} kbps", stream.bitrate)),
            });
            rows.push(TableRow {
                property: "Media Format",
                value: Cow::Owned(stream.media_format.to_string()),
            });
        }

        let mut table = Table::new(rows).with(Style::modern()).to_string();

        if list_streams {
            let stream_rows = media_info.streams.iter().map(|s| StreamRow {
                quality: &s.quality,
                format: s.stream_format.to_string(),
                bitrate: s.bitrate,
                codec: &s.codec,
                url: &s.url,
            });
            table.push('\n');
            table.push_str(&Table::new(stream_rows).with(Style::modern()).to_string());
        }

        table.push('\n');
        Ok(table)
    }

    fn format_csv(
        &self,
        media_info: &MediaInfo,
        stream_info: Option<&StreamInfo>,
        list_streams: bool,
    ) -> Result<String> {
        let mut output = String::new();

        if list_streams {
            output.push_str("quality,stream_format,media_format,bitrate,codec,url,selected\n");
            for stream in &media_info.streams {
                let selected = stream_info.is_some_and(|s| std::ptr::eq(s, stream));
                output.push_str(&format!(
                    "\"{}\",{},{},{},\"{}\",\"{}\",{}\n",
                    Self::escape_csv(&stream.quality),
                    stream.stream_format,
                    stream.media_format,
                    stream.bitrate,
                    Self::escape_csv(&stream.codec),
                    Self::escape_csv(&stream.url),
                    selected
                ));
            }
            return Ok(output);
        }

        output.push_str("property,value\n");
        output.push_str(&format!(
            "title,\"{}\"\n",
            Self::escape_csv(&media_info.title)
        ));
        output.push_str(&format!("channel,{}\n", media_info.channel));
        output.push_str(&format!("is_live,{}\n", media_info.is_live));

        if let Some(stream) = stream_info {
            output.push_str(&format!("stream_format,{}\n", stream.stream_format));
            output.push_str(&format!(
                "quality,\"{}\"\n",
                Self::escape_csv(&stream.quality)
            ));
            output.push_str(&format!("url,\"{}\"\n", Self::escape_csv(&stream.url)));
            output.push_str(&format!("bitrate,{}\n", stream.bitrate));
            output.push_str(&format!("media_format,{}\n", stream.media_format));
            output.push_str(&format!("codec,\"{}\"\n", Self::escape_csv(&stream.codec)));
            output.push_str(&format!("fps,{}\n", stream.fps));
        }

        Ok(output)
    }

    fn escape_csv(s: &str) -> Cow<'_, str> {
        if s.contains('"') {
            Cow::Owned(s.replace('"', "\"\""))
        } else {
            Cow::Borrowed(s)
        }
    }

    #[cfg_attr(not(feature = "colored-output"), allow(unused_variables))]
    fn colorize(&self, text: &str, color: &Color, bold: bool) -> String {
        #[cfg(feature = "colored-output")]
        {
            if self.colored {
                let colored_text = match color {
                    Color::Green => text.green(),
                    Color::Yellow => text.yellow(),
                    Color::Blue => text.blue(),
                    Color::Cyan => text.cyan(),
                };
                if bold {
                    colored_text.bold().to_string()
                } else {
                    colored_text.to_string()
                }
            } else {
                text.to_string()
            }
        }

        #[cfg(not(feature = "colored-output"))]
        {
            text.to_string()
        }
    }
}

#[cfg_attr(not(feature = "colored-output"), allow(dead_code))]
enum Color {
    Green,
    Yellow,
    Blue,
    Cyan,
}

pub fn write_output(content: &str, output_file: Option<&std::path::Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        None => {
            print!("{content}");
            std::io::stdout().flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media() -> MediaInfo {
        let mut hd = StreamInfo::http("hd", "https://cdn.example/a \"b\".mp4");
        hd.bitrate = 2500;
        MediaInfo::new(
            "https://www.1tv.ru/shows/vremya".to_string(),
            "Время".to_string(),
            "1tv".to_string(),
            false,
            vec![
                StreamInfo::http("sd", "https://cdn.example/sd.mp4"),
                hd,
            ],
            None,
        )
    }

    #[test]
    fn json_lists_streams_and_selection() {
        let media = media();
        let output = OutputManager::new(false)
            .format_media_info(
                &media,
                media.streams.last(),
                &OutputFormat::JsonCompact,
                true,
                true,
            )
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["media"]["title"], "Время");
        assert_eq!(value["media"]["is_live"], false);
        assert_eq!(value["streams"].as_array().unwrap().len(), 2);
        assert_eq!(value["stream"]["quality"], "hd");
        assert_eq!(value["stream"]["stream_format"], "http");
    }

    #[test]
    fn csv_escapes_quotes_and_marks_selection() {
        let media = media();
        let output = OutputManager::new(false)
            .format_media_info(&media, media.streams.last(), &OutputFormat::Csv, false, true)
            .unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(",false"));
        assert!(lines[2].contains("a \"\"b\"\".mp4"));
        assert!(lines[2].ends_with(",true"));
    }

    #[test]
    fn pretty_without_colors() {
        let media = media();
        let output = OutputManager::new(false)
            .format_media_info(&media, media.streams.first(), &OutputFormat::Pretty, true, false)
            .unwrap();
        assert!(output.starts_with("Media Information:\n  Title: Время\n"));
        assert!(output.contains("  Quality: sd\n"));
        assert!(!output.contains("Available Streams:"));
    }
}
