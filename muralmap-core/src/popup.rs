// Popup markup for the map markers. The consuming map renders this verbatim,
// so the anchor nesting and connector text must stay exactly as they are.

use muralmap_scanner::DetailInfo;

/// Popup HTML for one mural.
pub fn render_popup(page_link: &str, name: &str, detail: &DetailInfo, credit_help_url: &str) -> String {
    let mut popup = format!(r#"<a href="{}" target="blank">"#, page_link);
    popup.push_str(&format!("{}</a><br>", name));

    match (&detail.artist_name, &detail.artist_link) {
        (Some(artist), Some(artist_link)) => popup.push_str(&format!(
            r#"by <a href="{}" target="blank">{}</a><br>"#,
            artist_link, artist
        )),
        (Some(artist), None) => popup.push_str(&format!("by {}<br>", artist)),
        (None, _) => popup.push_str(&format!(
            r#"Help us <a href="{}" target="blank">give credit</a> to the artist.<br>"#,
            credit_help_url
        )),
    }

    popup.push_str(&format!(
        r#"<a href="{}" target="blank">"#,
        detail.image_info_url
    ));
    popup.push_str(&format!(r#"<img src="{}"></a><br>"#, detail.image_url));
    popup.push_str(&format!(
        r#"<a href="{}" target="blank">More info&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;"#,
        page_link
    ));
    popup.push_str(&format!(
        r#"</a><a href="{}" target="blank">Larger image</a>"#,
        detail.image_info_url
    ));
    popup
}
