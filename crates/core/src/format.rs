use crate::{
    narrate::NarrationResult,
    types::{PresentationResult, SlideKind},
};

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

pub fn format_presentation_readable(result: &PresentationResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", result.title));
    output.push_str(&format!(
        "**Source:** {} ({}) | **Slides:** {}\n\n",
        result.url,
        result.url_type.as_str(),
        result.slides.len()
    ));

    if let Some(error) = &result.error {
        output.push_str(&format!("**Error:** {}\n\n", error));
    }

    for (i, slide) in result.slides.iter().enumerate() {
        match slide.kind {
            SlideKind::Title => {
                output.push_str(&format!("## {}. {}\n\n", i + 1, slide.title));
                if !slide.subtitle_text().is_empty() {
                    output.push_str(&format!("_{}_\n\n", slide.subtitle_text()));
                }
            }
            SlideKind::Content | SlideKind::Closing | SlideKind::Error => {
                output.push_str(&format!("## {}. {}\n\n", i + 1, slide.title));
                output.push_str(&format!("{}\n\n", slide.content_text()));
            }
        }
    }

    output
}

pub fn format_narration_readable(result: &NarrationResult) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "**Total duration:** {} | **Transition:** {} ms\n\n",
        format_timestamp(result.total_duration_seconds),
        result.transition_ms
    ));

    for slide in &result.slides {
        output.push_str(&format!(
            "### [{}] {} ({})\n\n",
            slide.slide_index + 1,
            slide.title,
            format_timestamp(slide.duration_seconds)
        ));
        output.push_str(&format!("{}\n\n", slide.narration_text));
    }

    output
}
