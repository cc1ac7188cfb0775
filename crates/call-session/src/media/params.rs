//! Negotiated media parameters
//!
//! [`MediaParameters`] is an immutable value. Negotiation builds a new one
//! and the session swaps it in whole; nothing mutates a published instance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media encryption scheme in effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MediaEncryption {
    #[default]
    None,
    /// SRTP keyed through SDES
    Srtp,
    /// SRTP keyed through ZRTP; a SAS is produced for the voice stream
    Zrtp,
    /// SRTP keyed through DTLS
    Dtls,
}

impl fmt::Display for MediaEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaEncryption::None => f.write_str("none"),
            MediaEncryption::Srtp => f.write_str("srtp"),
            MediaEncryption::Zrtp => f.write_str("zrtp"),
            MediaEncryption::Dtls => f.write_str("dtls"),
        }
    }
}

/// Audio/video/encryption capabilities of one side of the call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaParameters {
    audio_enabled: bool,
    video_enabled: bool,
    encryption: MediaEncryption,
    low_bandwidth: bool,
    audio_codec: Option<String>,
    video_codec: Option<String>,
}

impl Default for MediaParameters {
    /// Audio only, unencrypted, no codec chosen yet
    fn default() -> Self {
        Self {
            audio_enabled: true,
            video_enabled: false,
            encryption: MediaEncryption::None,
            low_bandwidth: false,
            audio_codec: None,
            video_codec: None,
        }
    }
}

impl MediaParameters {
    pub fn builder() -> MediaParametersBuilder {
        MediaParametersBuilder::default()
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn video_enabled(&self) -> bool {
        self.video_enabled
    }

    pub fn encryption(&self) -> MediaEncryption {
        self.encryption
    }

    pub fn is_encrypted(&self) -> bool {
        self.encryption != MediaEncryption::None
    }

    pub fn low_bandwidth(&self) -> bool {
        self.low_bandwidth
    }

    /// Audio codec chosen by negotiation, e.g. `"PCMU"`
    pub fn audio_codec(&self) -> Option<&str> {
        self.audio_codec.as_deref()
    }

    pub fn video_codec(&self) -> Option<&str> {
        self.video_codec.as_deref()
    }

    /// Start a builder from this value, for deriving a renegotiated set
    pub fn to_builder(&self) -> MediaParametersBuilder {
        MediaParametersBuilder { params: self.clone() }
    }
}

/// Builder for [`MediaParameters`]
#[derive(Debug, Clone, Default)]
pub struct MediaParametersBuilder {
    params: MediaParameters,
}

impl MediaParametersBuilder {
    pub fn audio(mut self, enabled: bool) -> Self {
        self.params.audio_enabled = enabled;
        self
    }

    pub fn video(mut self, enabled: bool) -> Self {
        self.params.video_enabled = enabled;
        self
    }

    pub fn encryption(mut self, encryption: MediaEncryption) -> Self {
        self.params.encryption = encryption;
        self
    }

    pub fn low_bandwidth(mut self, enabled: bool) -> Self {
        self.params.low_bandwidth = enabled;
        self
    }

    pub fn audio_codec(mut self, codec: impl Into<String>) -> Self {
        self.params.audio_codec = Some(codec.into());
        self
    }

    pub fn video_codec(mut self, codec: impl Into<String>) -> Self {
        self.params.video_codec = Some(codec.into());
        self
    }

    pub fn build(self) -> MediaParameters {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_plain_audio() {
        let params = MediaParameters::default();
        assert!(params.audio_enabled());
        assert!(!params.video_enabled());
        assert!(!params.is_encrypted());
        assert_eq!(params.audio_codec(), None);
    }

    #[test]
    fn test_to_builder_leaves_original_alone() {
        let audio = MediaParameters::builder().audio_codec("PCMU").build();
        let upgraded = audio.to_builder().video(true).video_codec("VP8").build();

        assert!(!audio.video_enabled());
        assert!(upgraded.video_enabled());
        assert_eq!(upgraded.audio_codec(), Some("PCMU"));
        assert_eq!(upgraded.video_codec(), Some("VP8"));
    }
}
