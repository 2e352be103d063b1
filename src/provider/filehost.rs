//! Default adapter for the "SB" family of file hosts.
//!
//! Wire format, versioned here and nowhere else:
//! - the source page lists variants in `div#content table.tbl1`; each row's
//!   link fires `download_video('<id>','<mode>','<hash>')` and the second
//!   cell reads `"<resolution>, <display size>"`,
//! - the playback page at `/play<path>` embeds one grouped playlist URL
//!   (`<prefix>,<seg>,…,<seg>,<tail>`) that expands into a `.m3u8` per
//!   variant, in the same order the table lists them,
//! - each download route page carries the final link inside its content box.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::descriptor::RouteDescriptor;
use crate::error::{ResolutionError, Result};
use crate::http_client::SourceClient;
use crate::provider::SourceProvider;
use crate::task::Trace;

/// Host name fragments the default provider claims.
const KNOWN_HOSTS: &[&str] = &[
    "streamsb", "sbembed", "sbplay", "sbvideo", "sbfull", "sbfast", "tubesb",
];

/// Per-variant playlist suffix appended to each expanded segment.
const VARIANT_SUFFIX: &str = "/index-v1-a1.m3u8";

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div#content table.tbl1 tbody tr").expect("static selector")
});

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("static selector"));

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("static selector"));

static DIRECT_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div#container div.contentbox span a").expect("static selector")
});

/// Arguments of the row's `download_video('<id>','<mode>','<hash>')` handler.
static ONCLICK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"download_video\('(.*)'\)").expect("static regex"));

/// Grouped playlist URL embedded in the playback page. Commas are part of
/// the grouped form, so they stay inside the match.
static PLAYLIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^"'\s<>]+\.m3u8[^"'\s<>]*"#).expect("static regex"));

/// Provider for hosts speaking the SB wire format.
#[derive(Debug, Clone, Default)]
pub struct FileHostProvider {
    extra_hosts: Vec<String>,
}

impl FileHostProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim additional mirror hosts on top of the built-in list. Matching
    /// is by case-insensitive substring of the host name.
    #[must_use]
    pub fn with_hosts(hosts: impl IntoIterator<Item = String>) -> Self {
        Self {
            extra_hosts: hosts.into_iter().map(|h| h.to_ascii_lowercase()).collect(),
        }
    }
}

#[async_trait]
impl SourceProvider for FileHostProvider {
    fn name(&self) -> &'static str {
        "filehost"
    }

    fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        KNOWN_HOSTS.iter().any(|known| host.contains(known))
            || self.extra_hosts.iter().any(|extra| host.contains(extra.as_str()))
    }

    async fn discover_routes(
        &self,
        http: &SourceClient,
        url: &Url,
        trace: &Trace,
    ) -> Result<Vec<RouteDescriptor>> {
        let host = host_of(url)?;
        let body = http.fetch_html(url, trace).await?;
        let routes = parse_route_table(&body, &host)?;
        trace.push(format!("- scraped {} variant row(s)", routes.len()));
        Ok(routes)
    }

    async fn resolve_playback(
        &self,
        http: &SourceClient,
        url: &Url,
        route: &RouteDescriptor,
        position: usize,
        trace: &Trace,
    ) -> Result<String> {
        let play_url = playback_url(url)?;
        trace.push(format!("- formatted playback url {play_url}"));
        let body = http.fetch_html(&play_url, trace).await?;
        let raw = PLAYLIST_RE
            .find(&body)
            .ok_or_else(|| {
                ResolutionError::failure("no variant playlist found on playback page")
            })?
            .as_str();
        trace.push("- found grouped playlist url");
        let variants = expand_variant_urls(raw)?;
        variants.get(position).cloned().ok_or_else(|| {
            ResolutionError::failure(format!(
                "route {position} ({}) has no variant in a playlist of {}",
                route.resolution,
                variants.len()
            ))
        })
    }

    async fn resolve_direct_link(
        &self,
        http: &SourceClient,
        route: &Url,
        trace: &Trace,
    ) -> Result<String> {
        let body = http.fetch_html(route, trace).await?;
        let href = find_direct_anchor(&body).ok_or_else(|| {
            ResolutionError::failure("direct link not found in download route")
        })?;
        // Hosts emit both absolute and host-relative links here.
        let absolute = route
            .join(&href)
            .map_err(|e| ResolutionError::failure(format!("direct link is not a url: {e}")))?;
        trace.push("- scraped direct link");
        Ok(absolute.to_string())
    }
}

fn host_of(url: &Url) -> Result<String> {
    url.host_str()
        .map(str::to_string)
        .ok_or_else(|| ResolutionError::invalid_input("source URL has no host"))
}

/// `/play` mirror of a source page, where the host embeds its player setup.
fn playback_url(source: &Url) -> Result<Url> {
    let host = host_of(source)?;
    let formatted = format!("{}://{}/play{}", source.scheme(), host, source.path());
    Url::parse(&formatted)
        .map_err(|e| ResolutionError::failure(format!("cannot build playback url: {e}")))
}

/// Scrape the variant table off a source page.
///
/// Rows with fewer than two cells are header or spacer rows and are
/// skipped; rows that look like variants but fail to parse are errors, so
/// a site redesign surfaces loudly instead of as an empty list.
///
/// # Errors
///
/// Returns [`ResolutionError::ResolutionFailure`] when a variant row is
/// missing its download handler, its hash arguments or its size cell.
pub fn parse_route_table(html: &str, host: &str) -> Result<Vec<RouteDescriptor>> {
    let document = Html::parse_document(html);
    let mut routes = Vec::new();
    for (index, row) in document.select(&ROW_SELECTOR).enumerate() {
        let cells: Vec<_> = row.select(&CELL_SELECTOR).collect();
        if cells.len() < 2 {
            continue;
        }
        let anchor = cells[0].select(&ANCHOR_SELECTOR).next().ok_or_else(|| {
            ResolutionError::failure(format!("variant row {index} has no download link"))
        })?;
        let raw_args = ONCLICK_RE
            .captures(anchor.value().attr("onclick").unwrap_or_default())
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| {
                ResolutionError::failure(format!(
                    "variant row {index} has no download handler arguments"
                ))
            })?;
        let args: Vec<&str> = raw_args.as_str().split("','").collect();
        if args.len() < 3 {
            return Err(ResolutionError::failure(format!(
                "variant row {index} carries {} of 3 expected handler arguments",
                args.len()
            )));
        }
        let route_url = format!(
            "https://{host}/dl?op=download_orig&id={}&mode={}&hash={}",
            args[0], args[1], args[2]
        );
        let details = cells[1].text().collect::<String>();
        let (resolution, display_size) = split_details(&details).ok_or_else(|| {
            ResolutionError::failure(format!("variant row {index} has no file size"))
        })?;
        let quality = anchor.text().collect::<String>().trim().to_string();
        routes.push(RouteDescriptor::new(
            quality,
            resolution,
            parse_display_size(&display_size),
            route_url,
        ));
    }
    Ok(routes)
}

/// Split a details cell like `"720p, 25.3 MB"` into resolution and size.
fn split_details(details: &str) -> Option<(String, String)> {
    let (resolution, size) = details.split_once(',')?;
    let resolution = resolution.trim();
    let size = size.trim();
    if resolution.is_empty() {
        return None;
    }
    Some((resolution.to_string(), size.to_string()))
}

/// Parse an upstream display size like `"25.3 MB"` into bytes. Unrecognized
/// text parses to `0`, the "size unknown" sentinel.
#[must_use]
pub fn parse_display_size(text: &str) -> u64 {
    let text = text.trim();
    let unit_start = text
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(unit_start);
    let Ok(value) = number.parse::<f64>() else {
        return 0;
    };
    let multiplier = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1.0,
        "KB" | "KIB" => 1024.0,
        "MB" | "MIB" => 1024.0 * 1024.0,
        "GB" | "GIB" => 1024.0 * 1024.0 * 1024.0,
        _ => return 0,
    };
    (value * multiplier) as u64
}

/// Expand a grouped playlist URL into one playable URL per variant.
///
/// The grouped form is `<prefix>,<seg>,…,<seg>,<tail>`: the first segment
/// is the shared prefix, the last is the master-playlist tail, and every
/// middle segment names one variant.
///
/// # Errors
///
/// Returns [`ResolutionError::ResolutionFailure`] when the URL has fewer
/// than three comma segments and so cannot name any variant.
pub fn expand_variant_urls(grouped: &str) -> Result<Vec<String>> {
    let segments: Vec<&str> = grouped.split(',').collect();
    if segments.len() < 3 {
        return Err(ResolutionError::failure(
            "not enough segments to generate stream url",
        ));
    }
    let prefix = segments[0];
    Ok(segments[1..segments.len() - 1]
        .iter()
        .map(|segment| format!("{prefix}{segment}{VARIANT_SUFFIX}"))
        .collect())
}

fn find_direct_anchor(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&DIRECT_LINK_SELECTOR)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE_PAGE: &str = r##"
        <html><body><div id="content">
        <table class="tbl1"><tbody>
            <tr><td colspan="2"><b>Download</b></td></tr>
            <tr>
                <td><a href="#" onclick="download_video('k9d2x','o','h7f3')">Original quality</a></td>
                <td>720p, 25.3 MB</td>
            </tr>
            <tr>
                <td><a href="#" onclick="download_video('k9d2x','n','q2m8')">Normal quality</a></td>
                <td>480p, 10.0 MB</td>
            </tr>
        </tbody></table>
        </div></body></html>"##;

    #[test]
    fn parses_variant_rows_in_table_order() {
        let routes = parse_route_table(SOURCE_PAGE, "sbembed.com").unwrap();
        assert_eq!(routes.len(), 2);

        assert_eq!(routes[0].quality, "Original quality");
        assert_eq!(routes[0].resolution, "720p");
        assert_eq!(routes[0].size_bytes, (25.3 * 1024.0 * 1024.0) as u64);

        assert_eq!(routes[1].quality, "Normal quality");
        assert_eq!(routes[1].resolution, "480p");
        assert_eq!(routes[1].size_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn route_urls_rebuild_the_download_endpoint() {
        use crate::descriptor::Descriptor;
        let routes = parse_route_table(SOURCE_PAGE, "sbembed.com").unwrap();
        assert_eq!(
            routes[0].route_url(),
            "https://sbembed.com/dl?op=download_orig&id=k9d2x&mode=o&hash=h7f3"
        );
        assert_eq!(
            routes[1].route_url(),
            "https://sbembed.com/dl?op=download_orig&id=k9d2x&mode=n&hash=q2m8"
        );
    }

    #[test]
    fn pages_without_the_table_yield_no_routes() {
        let routes = parse_route_table("<html><body><p>gone</p></body></html>", "h").unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn missing_handler_arguments_are_an_error() {
        let page = r#"<div id="content"><table class="tbl1"><tbody>
            <tr><td><a onclick="download_video('only')">x</a></td><td>720p, 1 MB</td></tr>
        </tbody></table></div>"#;
        let err = parse_route_table(page, "h").unwrap_err();
        assert!(err.to_string().contains("handler arguments"), "got {err}");
    }

    #[test]
    fn missing_size_cell_is_an_error() {
        let page = r#"<div id="content"><table class="tbl1"><tbody>
            <tr><td><a onclick="download_video('a','n','c')">x</a></td><td>720p</td></tr>
        </tbody></table></div>"#;
        let err = parse_route_table(page, "h").unwrap_err();
        assert!(err.to_string().contains("file size"), "got {err}");
    }

    #[test]
    fn display_sizes_cover_the_usual_units() {
        assert_eq!(parse_display_size("512 B"), 512);
        assert_eq!(parse_display_size("1 KB"), 1024);
        assert_eq!(parse_display_size("25.3 MB"), (25.3 * 1024.0 * 1024.0) as u64);
        assert_eq!(parse_display_size("1.2 GB"), (1.2 * 1024.0 * 1024.0 * 1024.0) as u64);
        assert_eq!(parse_display_size("unknown"), 0);
        assert_eq!(parse_display_size(""), 0);
    }

    #[test]
    fn grouped_playlist_expands_middle_segments() {
        let grouped = "https://c.host/hls2/01/00001/,k9d2x_n,k9d2x_o,.urlset/master.m3u8";
        let urls = expand_variant_urls(grouped).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://c.host/hls2/01/00001/k9d2x_n/index-v1-a1.m3u8",
                "https://c.host/hls2/01/00001/k9d2x_o/index-v1-a1.m3u8",
            ]
        );
    }

    #[test]
    fn ungrouped_playlist_is_an_error() {
        let err = expand_variant_urls("https://c.host/plain/master.m3u8").unwrap_err();
        assert!(err.to_string().contains("not enough segments"));
    }

    #[test]
    fn playlist_regex_tolerates_surrounding_script() {
        let page = r#"jwplayer("vplayer").setup({sources:[{file:"https://c.host/hls2/,a_n,a_o,.urlset/master.m3u8?t=x&e=9"}]});"#;
        let found = PLAYLIST_RE.find(page).unwrap().as_str();
        assert!(found.starts_with("https://c.host/hls2/,"));
        assert!(found.ends_with("master.m3u8?t=x&e=9"));
    }

    #[test]
    fn playback_url_mirrors_scheme_host_and_path() {
        let source = Url::parse("https://sbembed.com/e/abc123.html").unwrap();
        let play = playback_url(&source).unwrap();
        assert_eq!(play.as_str(), "https://sbembed.com/play/e/abc123.html");
    }

    #[test]
    fn direct_anchor_is_scraped_from_the_content_box() {
        let page = r#"<div id="container"><div class="contentbox">
            <span><a href="https://dl.host/file/abc?token=t">Direct Download Link</a></span>
        </div></div>"#;
        assert_eq!(
            find_direct_anchor(page).as_deref(),
            Some("https://dl.host/file/abc?token=t")
        );
        assert!(find_direct_anchor("<div id=\"container\"></div>").is_none());
    }

    #[test]
    fn known_and_extra_hosts_are_claimed() {
        let provider = FileHostProvider::new();
        let claim = |raw: &str| provider.matches(&Url::parse(raw).unwrap());
        assert!(claim("https://sbembed.com/e/abc"));
        assert!(claim("https://www.streamsb.net/e/abc"));
        assert!(!claim("https://example.com/e/abc"));

        let mirrored = FileHostProvider::with_hosts(vec!["viewsb".to_string()]);
        assert!(mirrored.matches(&Url::parse("https://viewsb.com/e/abc").unwrap()));
    }
}
