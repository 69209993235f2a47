//! PDF and list payload fixtures

use lopdf::{Object, Stream, dictionary};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// Build an in-memory PDF with `page_count` pages, each showing its page number
pub fn pdf_with_pages(page_count: usize) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(595),
        Object::Integer(842),
    ];

    let mut page_ids = Vec::new();
    for n in 1..=page_count {
        let content = format!("BT /F1 12 Tf 72 760 Td (Page {n}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        }));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(page_count as i64),
    });

    for &pid in &page_ids {
        if let Ok(page) = doc.get_object_mut(pid)
            && let Ok(dict) = page.as_dict_mut()
        {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Write a PDF with `page_count` pages to `dir/name`
pub fn write_pdf(dir: &Path, name: &str, page_count: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_with_pages(page_count)).unwrap();
    path
}

/// A record as the list endpoint returns it
pub fn record_json(info_code: &str, title: &str, date: &str) -> Value {
    json!({
        "infoCode": info_code,
        "title": title,
        "publishDate": format!("{date}T00:00:00.000"),
        "orgSName": "Example Securities",
        "industryName": "Semiconductors",
    })
}

/// JSONP list body wrapping `records`
pub fn list_body(records: Vec<Value>, total_pages: u32) -> String {
    let hits = records.len();
    let payload = json!({
        "hits": hits,
        "size": hits,
        "data": records,
        "TotalPage": total_pages,
    });
    format!("datatable7654321({payload});")
}

/// Detail page markup with an optional PDF anchor
pub fn detail_html(href: Option<&str>) -> String {
    let anchor = href
        .map(|href| format!(r#"<a class="pdf-link" href="{href}">查看PDF原文</a>"#))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>研报详情</title></head>
  <body>
    <div class="c-infos">
      <span>2025-09-30</span>
      <span class="to-link">{anchor}</span>
    </div>
    <div class="ctx-content"><p>Summary text</p></div>
  </body>
</html>"#
    )
}
