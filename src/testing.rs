//! Offline fixtures shared by the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::client::PageFetcher;
use crate::error::{HowstatError, Result};

/// Serves canned pages and remembers every url it was asked for.
/// Unknown urls answer with a 404.
#[derive(Default)]
pub(crate) struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl StaticFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.requests.borrow_mut().push(url.to_owned());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| HowstatError::UnexpectedStatus {
                url: url.to_owned(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

/// Current-player listing with three linked players and two rows without a player link.
pub(crate) const ROSTER_PAGE: &str = r#"
<html><body>
<table class="TableLined">
  <tr><td class="TextBlackBold8">Name</td><td class="TextBlackBold8">Country</td></tr>
  <tr><td><a class="LinkNormal" href="PlayerOverviewSummary.asp?PlayerID=3600"> Virat Kohli </a></td><td>India</td></tr>
  <tr><td><a class="LinkNormal" href="PlayerOverviewSummary.asp?PlayerID=2756">Steven SMITH</a></td><td>Australia</td></tr>
  <tr><td colspan="2">Retired players are not listed</td></tr>
  <tr><td><a class="LinkNormal" href="PlayerOverviewSummary.asp?PlayerID=3419">Kane Williamson</a></td><td>New Zealand</td></tr>
</table>
</body></html>
"#;

/// Overview page whose series block lists `series` as (series name, metric text) rows.
pub(crate) fn bio_page(series: &[(&str, &str)]) -> String {
    let series_rows: String = series
        .iter()
        .map(|(name, metric)| {
            format!(
                "<tr><td class=\"TextBlackBold10\">{name}</td><td class=\"TextBlack10\">{metric}</td></tr>"
            )
        })
        .collect();
    format!(
        r#"
<html><body>
<table><tr><td>
  <table><tr><td>
    <table>
      <tr><td class="TextGreenBold12">Virat&nbsp;Kohli (IND)</td></tr>
      <tr><td class="FieldName">Full Name:</td><td class="FieldValue">Virat Kohli</td></tr>
      <tr><td class="FieldName">Born:</td><td class="FieldValue">5th November, 1988</td></tr>
      <tr><td class="FieldName">Bats:</td><td class="FieldValue">Right</td></tr>
      <tr><td class="FieldName">Nickname:</td><td class="FieldValue">  </td></tr>
    </table>
    <table>
      {series_rows}
    </table>
  </td></tr></table>
</td></tr></table>
</body></html>
"#
    )
}

/// Stats page exercising section tracking and the field allow-list.
pub(crate) const STATS_PAGE: &str = r#"
<html><body>
<table>
  <tr><td class="FieldName">Innings:</td><td class="FieldValue">999</td></tr>
  <tr><td class="ProfileSection">Batting</td></tr>
  <tr><td class="FieldName">Innings:</td><td class="FieldValue"> 141 </td></tr>
  <tr><td class="FieldName">Not Outs:</td><td class="FieldValue">10</td></tr>
  <tr><td class="FieldName">Aggregate:</td><td class="FieldValue">7240</td></tr>
  <tr><td class="FieldName">Average:</td><td class="FieldValue">55.27</td></tr>
  <tr><td class="FieldName">Balls Faced:</td><td class="FieldValue">12000</td></tr>
  <tr><td class="ProfileSection">Bowling</td></tr>
  <tr><td class="FieldName">Wickets:</td><td class="FieldValue">0</td></tr>
  <tr><td class="FieldName">Average:</td><td class="FieldValue">-</td></tr>
  <tr><td class="ProfileSection">Overall</td></tr>
  <tr><td class="FieldName">Economy Rate:</td><td class="FieldValue">3.30</td></tr>
  <tr><td class="ProfileSection">Wicket Keeping</td></tr>
  <tr><td class="FieldName">Stumpings:</td><td class="FieldValue">0</td></tr>
  <tr><td class="FieldName">Catches:</td></tr>
</table>
</body></html>
"#;
