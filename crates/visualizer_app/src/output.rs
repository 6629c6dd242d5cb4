use std::path::{Path, PathBuf};

use anyhow::Context;
use engine_logging::engine_info;
use visualizer_core::RenderTarget;
use visualizer_engine::{
    ensure_output_dir, result_file_name, AtomicFileWriter, ClientSettings, ReqwestTaskClient,
};

/// Writes a presented result into `output_dir`. Videos are downloaded again
/// through a short-lived runtime; explanations are written as Markdown.
pub fn save_result(
    output_dir: &Path,
    client_settings: ClientSettings,
    result_path: &str,
    target: &RenderTarget,
) -> anyhow::Result<PathBuf> {
    ensure_output_dir(output_dir)?;
    let file_name = result_file_name(result_path)?;
    let writer = AtomicFileWriter::new(output_dir.to_path_buf());

    let saved = match target {
        RenderTarget::Video { url, .. } => {
            let bytes = download(client_settings, url)?;
            writer.write(&file_name, &bytes)?
        }
        RenderTarget::Explanation { topic, explanation } => {
            let markdown = explanation_markdown(topic, explanation);
            writer.write(&format!("{file_name}.md"), markdown.as_bytes())?
        }
    };
    engine_info!("Saved result to {:?}", saved);
    Ok(saved)
}

fn download(client_settings: ClientSettings, url: &str) -> anyhow::Result<Vec<u8>> {
    let client = ReqwestTaskClient::new(client_settings)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start download runtime")?;
    let bytes = runtime
        .block_on(client.download_video(url))
        .with_context(|| format!("failed to download {url}"))?;
    Ok(bytes)
}

fn explanation_markdown(topic: &str, explanation: &str) -> String {
    format!("# {topic}\n\n{explanation}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explanation_is_saved_as_markdown_next_to_result_name() {
        let temp = tempfile::tempdir().unwrap();
        let target = RenderTarget::Explanation {
            topic: "Limits".to_string(),
            explanation: "A limit describes approach.".to_string(),
        };

        let saved = save_result(
            temp.path(),
            ClientSettings::default(),
            "explanations/limits.json",
            &target,
        )
        .unwrap();

        assert_eq!(saved, temp.path().join("limits.json.md"));
        let text = std::fs::read_to_string(saved).unwrap();
        assert_eq!(text, "# Limits\n\nA limit describes approach.\n");
    }

    #[test]
    fn traversal_result_names_are_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let target = RenderTarget::Explanation {
            topic: "x".to_string(),
            explanation: "y".to_string(),
        };
        assert!(save_result(temp.path(), ClientSettings::default(), "..", &target).is_err());
    }
}
