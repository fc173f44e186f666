use crate::state::DiscoveredLink;
use std::io::{self, Write};

/// Writes the link report
///
/// One line per URL in the order given (the registry snapshot is already sorted).
/// With `include_details`, redirect targets and error messages follow on
/// tab-indented lines. The report ends with the count of unique links.
///
/// # Example
///
/// ```
/// use link_trawler::output::write_report;
/// use link_trawler::state::{DiscoveredLink, LinkStatus};
///
/// let mut link = DiscoveredLink::pending("http://h/a");
/// link.status = LinkStatus::Redirected { target: "http://h/x".to_string() };
///
/// let mut out = Vec::new();
/// write_report(&mut out, &[link], true).unwrap();
///
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "http://h/a\n\tRedirects to: http://h/x\nFound 1 unique links\n"
/// );
/// ```
pub fn write_report<W: Write>(
    out: &mut W,
    links: &[DiscoveredLink],
    include_details: bool,
) -> io::Result<()> {
    for link in links {
        writeln!(out, "{}", link.url)?;

        if !include_details {
            continue;
        }

        if let Some(target) = link.redirect_target() {
            writeln!(out, "\tRedirects to: {}", target)?;
        }

        if let Some(message) = link.error_message() {
            writeln!(out, "\tError detected: {}", message)?;
        }
    }

    writeln!(out, "Found {} unique links", links.len())?;
    out.flush()
}

/// Writes the link report to stdout
pub fn print_report(links: &[DiscoveredLink], include_details: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_report(&mut handle, links, include_details)
}
