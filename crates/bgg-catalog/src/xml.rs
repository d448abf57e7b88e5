use crate::{CatalogError, Game};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

fn xml_error(e: impl std::fmt::Display) -> CatalogError {
    CatalogError::Xml(e.to_string())
}

/// Value of `name`, or `None` when the attribute is missing or blank.
fn attribute(e: &BytesStart, name: &str) -> Result<Option<String>, CatalogError> {
    let Some(attr) = e.try_get_attribute(name).map_err(xml_error)? else {
        return Ok(None);
    };
    let value = attr.unescape_value().map_err(xml_error)?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// An `<item>` being assembled.
#[derive(Default)]
struct PartialItem {
    id: Option<String>,
    name: Option<String>,
    name_is_primary: bool,
    year: Option<String>,
}

impl PartialItem {
    fn start(e: &BytesStart) -> Result<Self, CatalogError> {
        Ok(Self {
            id: attribute(e, "id")?,
            ..Default::default()
        })
    }

    fn child(&mut self, e: &BytesStart) -> Result<(), CatalogError> {
        match e.name().as_ref() {
            b"name" => {
                let is_primary = attribute(e, "type")?.as_deref() == Some("primary");
                // Keep the first name unless a later one is explicitly primary
                if (self.name.is_none() || (is_primary && !self.name_is_primary))
                    && let Some(value) = attribute(e, "value")?
                {
                    self.name = Some(value);
                    self.name_is_primary = is_primary;
                }
            }
            b"yearpublished" => self.year = attribute(e, "value")?,
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Option<Game> {
        match (self.id, self.name) {
            (Some(id), Some(name)) => Some(Game {
                id,
                name,
                year: self.year,
            }),
            (id, _) => {
                log::debug!("Dropping catalog item without id or name (id: {:?})", id);
                None
            }
        }
    }
}

/// Parse a `search` or `thing` response body into games, in document order.
pub fn parse_items(body: &str) -> Result<Vec<Game>, CatalogError> {
    let mut reader = Reader::from_str(body);
    let mut games = Vec::new();
    let mut current: Option<PartialItem> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Eof => break,

            Event::Start(ref e) if e.name().as_ref() == b"item" => {
                current = Some(PartialItem::start(e)?);
            }

            // `<item id="1"/>` has no name and is never a game
            Event::Empty(ref e) if e.name().as_ref() == b"item" => {}

            Event::End(ref e) if e.name().as_ref() == b"item" => {
                if let Some(game) = current.take().and_then(PartialItem::finish) {
                    games.push(game);
                }
            }

            Event::Start(ref e) | Event::Empty(ref e) => {
                if let Some(item) = current.as_mut() {
                    item.child(e)?;
                }
            }

            _ => {}
        }
    }

    Ok(games)
}
