use anyhow::Result;

use pagedex_core::{clean_date_mention, DateNormalizer, PageId};

/// Prints `<text>\t<dates>` per argument; `-` when nothing was recognized.
pub fn run(texts: &[String]) -> Result<()> {
    let normalizer = DateNormalizer::default();
    let page = PageId::new("cli", "0");

    for text in texts {
        let dates = normalizer
            .normalize(&clean_date_mention(text), &page)
            .map_or_else(|| "-".to_string(), |d| d.join(","));
        println!("{text}\t{dates}");
    }

    Ok(())
}
