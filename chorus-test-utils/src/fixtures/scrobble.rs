//! Scrobble HTTP mock endpoint creation utilities.
//!
//! This module provides methods for creating mock HTTP endpoints that simulate
//! the scrobble service's weekly chart API. All chart methods share the `/2.0/`
//! path and are told apart by the `method` query parameter, so every mock
//! matches on `method` and `user` rather than the path.

use mockito::Matcher;
use serde_json::json;

use crate::TestSetup;

impl TestSetup {
    pub fn scrobble<'a>(&'a mut self) -> ScrobbleFixtures<'a> {
        ScrobbleFixtures { setup: self }
    }
}

pub struct ScrobbleFixtures<'a> {
    pub setup: &'a mut TestSetup,
}

impl<'a> ScrobbleFixtures<'a> {
    /// Create a mock weekly artist chart endpoint for one user.
    ///
    /// Rows are returned in the order given, with ranks assigned 1..n and
    /// playcounts serialized as strings the way the upstream service does.
    /// The mock verifies it was called exactly `expected_requests` times.
    ///
    /// # Arguments
    /// - `username` - User the chart belongs to; matched against the `user` query parameter
    /// - `items` - `(artist name, playcount)` pairs in rank order
    /// - `expected_requests` - Number of times this endpoint should be called
    pub async fn mock_weekly_artist_chart(
        &mut self,
        username: &str,
        items: &[(&str, i64)],
        expected_requests: usize,
    ) {
        let rows: Vec<serde_json::Value> = items
            .iter()
            .enumerate()
            .map(|(index, (name, playcount))| {
                json!({
                    "name": name,
                    "playcount": playcount.to_string(),
                    "@attr": { "rank": (index + 1).to_string() }
                })
            })
            .collect();

        let body = json!({ "weeklyartistchart": { "artist": rows } });

        let mock = self
            .setup
            .server
            .mock("GET", "/2.0/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("method".into(), "user.getweeklyartistchart".into()),
                Matcher::UrlEncoded("user".into(), username.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create_async()
            .await;

        self.setup.mocks.push(mock);
    }

    /// Create a mock weekly track chart endpoint for one user.
    ///
    /// # Arguments
    /// - `username` - User the chart belongs to; matched against the `user` query parameter
    /// - `items` - `(track name, artist name, playcount)` triples in rank order
    /// - `expected_requests` - Number of times this endpoint should be called
    pub async fn mock_weekly_track_chart(
        &mut self,
        username: &str,
        items: &[(&str, &str, i64)],
        expected_requests: usize,
    ) {
        let body = json!({
            "weeklytrackchart": { "track": credited_rows(items) }
        });

        let mock = self
            .setup
            .server
            .mock("GET", "/2.0/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("method".into(), "user.getweeklytrackchart".into()),
                Matcher::UrlEncoded("user".into(), username.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create_async()
            .await;

        self.setup.mocks.push(mock);
    }

    /// Create a mock weekly album chart endpoint for one user.
    ///
    /// # Arguments
    /// - `username` - User the chart belongs to; matched against the `user` query parameter
    /// - `items` - `(album name, artist name, playcount)` triples in rank order
    /// - `expected_requests` - Number of times this endpoint should be called
    pub async fn mock_weekly_album_chart(
        &mut self,
        username: &str,
        items: &[(&str, &str, i64)],
        expected_requests: usize,
    ) {
        let body = json!({
            "weeklyalbumchart": { "album": credited_rows(items) }
        });

        let mock = self
            .setup
            .server
            .mock("GET", "/2.0/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("method".into(), "user.getweeklyalbumchart".into()),
                Matcher::UrlEncoded("user".into(), username.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create_async()
            .await;

        self.setup.mocks.push(mock);
    }

    /// Create a mock chart endpoint that returns an error status for one user.
    ///
    /// Matches on the `user` query parameter only, so whichever chart category
    /// is requested first receives the error. Useful for testing retry logic
    /// and failed-member handling.
    ///
    /// # Arguments
    /// - `username` - User whose requests should fail
    /// - `status_code` - HTTP status code to return (e.g. 500, 429, 403)
    /// - `expected_requests` - Number of times this endpoint should be called
    pub async fn mock_chart_error(
        &mut self,
        username: &str,
        status_code: usize,
        expected_requests: usize,
    ) {
        let mock = self
            .setup
            .server
            .mock("GET", "/2.0/")
            .match_query(Matcher::UrlEncoded("user".into(), username.into()))
            .with_status(status_code)
            .expect(expected_requests)
            .create_async()
            .await;

        self.setup.mocks.push(mock);
    }
}

fn credited_rows(items: &[(&str, &str, i64)]) -> Vec<serde_json::Value> {
    items
        .iter()
        .enumerate()
        .map(|(index, (name, artist, playcount))| {
            json!({
                "name": name,
                "artist": { "#text": artist },
                "playcount": playcount.to_string(),
                "@attr": { "rank": (index + 1).to_string() }
            })
        })
        .collect()
}
