//! Tests for the eSpeak speech-output engine

#[cfg(test)]
mod tests {
    use crate::EspeakSpeech;
    use intervox_tts::{SpeechOutput, SpeechOutputError, VoiceSettings};

    #[tokio::test]
    async fn availability_probe_does_not_panic() {
        // The test environment may or may not have espeak installed.
        let _available = EspeakSpeech::is_available().await;
    }

    #[test]
    fn args_carry_voice_settings() {
        let engine = EspeakSpeech::new(VoiceSettings {
            voice: Some("en-us".to_string()),
            speech_rate: 150,
            pitch: 1.2,
            volume: 0.5,
        });
        let args = engine.build_args("hello");
        assert_eq!(
            args,
            vec!["-v", "en-us", "-s", "150", "-p", "60", "-a", "100", "hello"]
        );
    }

    #[test]
    fn args_omit_voice_flag_for_default_voice() {
        let engine = EspeakSpeech::new(VoiceSettings::default());
        let args = engine.build_args("hi");
        assert!(!args.contains(&"-v".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("hi"));
    }

    #[test]
    fn pitch_and_volume_are_clamped() {
        let engine = EspeakSpeech::new(VoiceSettings {
            voice: None,
            speech_rate: 180,
            pitch: 9.0,
            volume: 2.0,
        });
        let args = engine.build_args("x");
        let p = args.iter().position(|a| a == "-p").unwrap();
        let a = args.iter().position(|a| a == "-a").unwrap();
        assert_eq!(args[p + 1], "99");
        assert_eq!(args[a + 1], "200");
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let engine = EspeakSpeech::new(VoiceSettings::default());
        assert!(matches!(
            engine.speak("   ").await,
            Err(SpeechOutputError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn stop_without_speak_is_a_noop() {
        let engine = EspeakSpeech::new(VoiceSettings::default());
        engine.stop_immediately().await.unwrap();
        engine.stop_immediately().await.unwrap();
    }
}
