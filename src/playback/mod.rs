//! Playback collaborator surface.

/// The playback trait, rational speed, and the reference `Timeline`.
pub mod timeline;
