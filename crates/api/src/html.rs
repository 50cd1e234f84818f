//! Server-rendered pages for the public card route.
//!
//! Pages are small and static, so they are built as strings. Every value
//! that came from a record goes through [`escape_html`].

use std::fmt::Write;

use schoolerp_core::card::{IdCard, PersonTile, ISSUER};
use schoolerp_core::entity::EntityKind;

const STYLE: &str = r#"
*{box-sizing:border-box;margin:0;padding:0}
body{min-height:100vh;display:flex;align-items:center;justify-content:center;padding:24px;
  background:#0f0e1a;color:#cbd5e1;font-family:Inter,system-ui,sans-serif}
.card{width:100%;max-width:420px;border-radius:24px;overflow:hidden;background:#16152a;
  border:1px solid rgba(255,255,255,.08);box-shadow:0 24px 64px rgba(0,0,0,.5)}
.head{padding:24px;text-align:center;color:#fff}
.head.student{background:linear-gradient(135deg,#4f46e5,#7c3aed)}
.head.teacher{background:linear-gradient(135deg,#db2777,#9333ea)}
.issuer{font-size:11px;letter-spacing:.12em;text-transform:uppercase;opacity:.8}
.badge{display:inline-block;margin:8px 0 16px;padding:4px 12px;border-radius:999px;
  background:rgba(255,255,255,.2);font-size:11px;font-weight:700;letter-spacing:.08em}
.avatar{width:96px;height:96px;margin:0 auto 12px;border-radius:16px;object-fit:cover;
  display:flex;align-items:center;justify-content:center;font-size:32px;font-weight:700;
  background:rgba(255,255,255,.2);border:3px solid rgba(255,255,255,.4)}
h1{font-size:22px}
.chips{margin-top:8px;font-size:12px;opacity:.9}
.body{padding:20px}
.idbox{padding:12px;border-radius:12px;margin-bottom:16px;background:rgba(99,102,241,.12);
  border:1px solid rgba(99,102,241,.2)}
.idbox p:first-child{font-size:11px;color:#64748b}
.idbox p:last-child{font-family:monospace;font-size:12px;font-weight:700;color:#a5b4fc}
h2{margin:16px 0 8px;font-size:11px;text-transform:uppercase;letter-spacing:.1em;color:#475569}
.row{display:flex;justify-content:space-between;gap:12px;padding:8px 0;font-size:13px;
  border-bottom:1px solid rgba(255,255,255,.05)}
.row span:first-child{color:#64748b}
.people{display:grid;grid-template-columns:1fr 1fr;gap:12px;margin-top:12px}
.person{padding:12px;border-radius:12px;text-align:center;background:rgba(255,255,255,.04)}
.person .avatar{width:56px;height:56px;font-size:20px;margin-bottom:8px}
.person small{display:block;color:#64748b;font-size:11px}
.qr{margin-top:20px;padding:16px;border-radius:12px;text-align:center;background:#fff}
.qr p{color:#475569;font-size:11px;margin-bottom:8px}
.qr svg{width:160px;height:160px}
.foot{padding:16px 0 0;text-align:center;font-size:11px;color:#475569}
.missing{max-width:420px;text-align:center}
.missing h1{font-size:28px;color:#fff;margin:16px 0 8px}
"#;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <meta name=\"robots\" content=\"noindex\">\
         <title>{}</title><style>{STYLE}</style></head><body>{body}</body></html>",
        escape_html(title)
    )
}

fn avatar(photo_url: Option<&str>, initial: &str, alt: &str) -> String {
    match photo_url {
        Some(url) => format!(
            "<img class=\"avatar\" src=\"{}\" alt=\"{}\">",
            escape_html(url),
            escape_html(alt)
        ),
        None => format!("<div class=\"avatar\">{}</div>", escape_html(initial)),
    }
}

fn person_tile(person: &PersonTile) -> String {
    let name = if person.name.trim().is_empty() {
        "Not provided"
    } else {
        person.name.as_str()
    };
    format!(
        "<div class=\"person\">{}<strong>{}</strong><small>{}</small></div>",
        avatar(person.photo_url.as_deref(), &person.initial, &person.name),
        escape_html(name),
        escape_html(person.role)
    )
}

/// Drop the XML declaration so the SVG can sit inline in HTML.
fn inline_svg(svg: &str) -> &str {
    svg.find("<svg").map_or(svg, |start| &svg[start..])
}

/// Full HTML page for an identity card.
pub fn render_card_page(card: &IdCard) -> String {
    let kind_class = match card.kind {
        EntityKind::Student => "student",
        EntityKind::Teacher => "teacher",
    };

    let mut body = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        body,
        "<main class=\"card\"><header class=\"head {kind_class}\">\
         <p class=\"issuer\">{issuer}</p><span class=\"badge\">{badge}</span>{avatar}\
         <h1>{name}</h1><p class=\"chips\">{chips}</p></header><section class=\"body\">\
         <div class=\"idbox\"><p>{label} ID</p><p>{display_id}</p></div>",
        issuer = escape_html(ISSUER),
        badge = escape_html(&card.badge),
        avatar = avatar(card.photo_url.as_deref(), &card.initial, &card.name),
        name = escape_html(&card.name),
        chips = card
            .headline
            .iter()
            .map(|h| escape_html(h))
            .collect::<Vec<_>>()
            .join(" &bull; "),
        label = card.kind.label(),
        display_id = escape_html(&card.display_id),
    );

    for section in &card.sections {
        let _ = write!(body, "<h2>{}</h2>", escape_html(section.title));
        for row in &section.rows {
            let _ = write!(
                body,
                "<div class=\"row\"><span>{}</span><span>{}</span></div>",
                escape_html(row.label),
                escape_html(&row.value)
            );
        }
    }

    if !card.people.is_empty() {
        body.push_str("<div class=\"people\">");
        for person in &card.people {
            body.push_str(&person_tile(person));
        }
        body.push_str("</div>");
    }

    let _ = write!(
        body,
        "<div class=\"qr\"><p>Scan QR to verify identity</p>{svg}</div>\
         <footer class=\"foot\"><p>Issued: {issued}</p>\
         <p>This is an official digital identity card issued by {issuer}</p></footer>\
         </section></main>",
        svg = inline_svg(&card.qr_svg),
        issued = escape_html(&card.issued_on),
        issuer = escape_html(ISSUER),
    );

    page(&format!("{} - {}", card.name, card.badge), &body)
}

/// The page shown for any profile URL that does not resolve.
pub fn render_not_found_page() -> String {
    page(
        "Profile Not Found",
        &format!(
            "<main class=\"missing\"><p class=\"issuer\">{}</p><h1>Profile Not Found</h1>\
             <p>This identity card does not exist or has been removed.</p></main>",
            escape_html(ISSUER)
        ),
    )
}
