use super::*;

#[derive(Default)]
struct Recorder {
    supported: bool,
    fail: bool,
    shared: Vec<(String, String, String, usize)>,
}

impl ShareTarget for Recorder {
    fn can_share(&self, payload: &SharePayload<'_>) -> bool {
        self.supported && payload.mime == "image/png"
    }

    fn share(&mut self, payload: &SharePayload<'_>) -> BadgeResult<()> {
        if self.fail {
            return Err(BadgeError::share_unsupported("user cancelled"));
        }
        self.shared.push((
            payload.title.to_string(),
            payload.text.to_string(),
            payload.file_name.to_string(),
            payload.bytes.len(),
        ));
        Ok(())
    }
}

#[derive(Default)]
struct MemoryDownloads {
    saved: Vec<(String, Vec<u8>)>,
}

impl DownloadSink for MemoryDownloads {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> BadgeResult<PathBuf> {
        self.saved.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

fn badge() -> RenderedBadge {
    RenderedBadge {
        width: 1,
        height: 1,
        png: vec![9; 16],
    }
}

#[test]
fn supported_target_receives_payload() {
    let mut target = Recorder {
        supported: true,
        ..Recorder::default()
    };
    let mut dl = MemoryDownloads::default();
    let out = share_or_download(
        &badge(),
        "Ada Lovelace",
        &ShareConfig::default(),
        &mut target,
        &mut dl,
    )
    .unwrap();

    assert_eq!(out, ShareOutcome::Shared);
    assert!(dl.saved.is_empty());
    assert_eq!(
        target.shared,
        vec![(
            "My H.E.R DAO Event ID".to_string(),
            "Check out my H.E.R DAO event badge!".to_string(),
            "Ada_Lovelace_HER_DAO_Badge.png".to_string(),
            16
        )]
    );
}

#[test]
fn unsupported_or_failing_target_falls_back_to_download() {
    let mut dl = MemoryDownloads::default();
    let out = share_or_download(
        &badge(),
        "Ada",
        &ShareConfig::default(),
        &mut NoShareTarget,
        &mut dl,
    )
    .unwrap();
    assert_eq!(
        out,
        ShareOutcome::Downloaded(PathBuf::from("Ada_HER_DAO_Badge.png"))
    );

    let mut failing = Recorder {
        supported: true,
        fail: true,
        ..Recorder::default()
    };
    let out = share_or_download(
        &badge(),
        "Ada",
        &ShareConfig::default(),
        &mut failing,
        &mut dl,
    )
    .unwrap();
    assert!(matches!(out, ShareOutcome::Downloaded(_)));
    assert_eq!(dl.saved.len(), 2);
    assert_eq!(dl.saved[1].1, vec![9; 16]);
}

#[test]
fn no_share_target_refuses() {
    let payload = SharePayload {
        title: "t",
        text: "x",
        file_name: "f.png",
        mime: "image/png",
        bytes: &[],
    };
    assert!(!NoShareTarget.can_share(&payload));
    assert!(matches!(
        NoShareTarget.share(&payload),
        Err(BadgeError::ShareUnsupported(_))
    ));
}

#[test]
fn intent_url_encodes_text_and_link() {
    let cfg = ShareConfig {
        link: Some("https://example.org/event?id=7".to_string()),
        ..ShareConfig::default()
    };
    let url = SocialPost::from_config(&cfg).intent_url().unwrap();
    assert_eq!(url.host_str(), Some("twitter.com"));

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            (
                "text".to_string(),
                "Check out my H.E.R DAO event badge!".to_string()
            ),
            (
                "url".to_string(),
                "https://example.org/event?id=7".to_string()
            ),
        ]
    );
    assert!(!url.as_str().contains(' '));
}

#[test]
fn bad_intent_base_is_validation_error() {
    let post = SocialPost {
        text: "hi".into(),
        link: None,
        intent_base: "not a url".into(),
    };
    assert!(matches!(post.intent_url(), Err(BadgeError::Validation(_))));
}
