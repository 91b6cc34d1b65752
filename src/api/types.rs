use url::Url;

/// One asset listed by the wiki
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// File name without the `File:` namespace (e.g. `Example.jpg`)
    pub name: String,

    /// Where the asset bytes live
    pub asset_url: Url,

    /// The wiki's description page for the asset
    pub description_url: Url,
}

/// One parsed page of the `allimages` listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResponse {
    /// Records in server order
    pub records: Vec<ImageRecord>,

    /// Offset of the next page; `None` when this page is the last one.
    /// `Some("")` is still a cursor.
    pub next_cursor: Option<String>,
}

/// A wiki article and the images it embeds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WikiPage {
    pub title: String,
    pub image_titles: Vec<String>,
}
