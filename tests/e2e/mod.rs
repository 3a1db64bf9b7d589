// End-to-end tests for the Lingo Gateway HTTP API
//
// Each test gets its own server on an ephemeral port, its own wiremock
// server standing in for the Google endpoints and its own temporary upload
// directory, so tests run in parallel without sharing state.

mod helpers;
mod test_health;
mod test_recognize;
mod test_speak;
