use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// A kind of recyclable material a collection point may accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub title: String,
    /// Icon reference as stored by the backend (usually a file name).
    #[serde(rename = "image")]
    pub image_ref: String,
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// A physical location accepting recyclable materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPoint {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub uf: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub email: String,
}

impl CollectionPoint {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// `City, UF` line used by list rows and the detail header.
    pub fn address(&self) -> String {
        format!("{}, {}", self.city, self.uf)
    }
}

impl Display for CollectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Title of an item accepted by a point, as embedded in the detail payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedItem {
    pub title: String,
}

/// Response of `GET /points/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointDetail {
    pub point: CollectionPoint,
    #[serde(default)]
    pub items: Vec<AcceptedItem>,
}

/// Geographic position in decimal degrees.
///
/// The origin doubles as "no fix": a screen that never obtained a device
/// position keeps `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[allow(clippy::float_cmp)]
    pub fn is_unset(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_backend_json() {
        let json = r#"[{"id":1,"title":"Lâmpadas","image":"lampadas.svg"}]"#;
        let categories: Vec<Category> = serde_json::from_str(json).unwrap();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].title, "Lâmpadas");
        assert_eq!(categories[0].image_ref, "lampadas.svg");
    }

    #[test]
    fn test_point_detail_from_backend_json() {
        let json = r#"{
            "point": {
                "id": 7, "image": "market.jpg", "image_url": "http://localhost:3333/uploads/market.jpg",
                "name": "Mercado Central", "latitude": -23.55, "longitude": -46.63,
                "city": "Sao Paulo", "uf": "SP", "whatsapp": "11999999999", "email": "contato@mercado.com"
            },
            "items": [{"title": "Lâmpadas"}, {"title": "Óleo de Cozinha"}]
        }"#;
        let detail: PointDetail = serde_json::from_str(json).unwrap();

        assert_eq!(detail.point.name, "Mercado Central");
        assert_eq!(detail.point.address(), "Sao Paulo, SP");
        assert_eq!(detail.items.len(), 2);
    }

    #[test]
    fn test_unset_coordinates() {
        assert!(Coordinates::default().is_unset());
        assert!(!Coordinates::new(-23.55, -46.63).is_unset());
    }
}
