//! Redeemable products and their rental service codes.

// self
use crate::{_prelude::*, error::ConfigError};

/// Products a voucher can be redeemed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
	/// ZUS Coffee app sign-up.
	Zus,
	/// KFC app sign-up.
	Kfc,
	/// CHAGEE app sign-up.
	Chagee,
	/// Tealive app sign-up.
	Tealive,
}
impl Product {
	/// Every product in display order.
	pub const ALL: [Self; 4] = [Self::Zus, Self::Tealive, Self::Kfc, Self::Chagee];

	/// Stable lowercase key used by forms and configuration.
	pub fn key(self) -> &'static str {
		self.entry().key
	}

	/// Rental-provider service code that issues numbers for this product's OTPs.
	pub fn service_code(self) -> &'static str {
		self.entry().service_code
	}

	/// Human-readable product name.
	pub fn label(self) -> &'static str {
		self.entry().label
	}

	/// Logo image URL shown next to the product.
	pub fn logo(self) -> &'static str {
		self.entry().logo
	}

	fn entry(self) -> &'static CatalogEntry {
		match self {
			Self::Zus => &CATALOG[0],
			Self::Kfc => &CATALOG[1],
			Self::Chagee => &CATALOG[2],
			Self::Tealive => &CATALOG[3],
		}
	}
}
impl Display for Product {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.key())
	}
}
impl FromStr for Product {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let key = s.trim();

		CATALOG
			.iter()
			.find(|entry| entry.key.eq_ignore_ascii_case(key))
			.map(|entry| entry.product)
			.ok_or_else(|| ConfigError::UnmappedProduct { choice: s.to_owned() })
	}
}

struct CatalogEntry {
	product: Product,
	key: &'static str,
	service_code: &'static str,
	label: &'static str,
	logo: &'static str,
}

static CATALOG: [CatalogEntry; 4] = [
	CatalogEntry {
		product: Product::Zus,
		key: "zus",
		service_code: "aik",
		label: "Zus Coffee",
		logo: "https://seeklogo.com/images/Z/zus-coffee-logo.png",
	},
	CatalogEntry {
		product: Product::Kfc,
		key: "kfc",
		service_code: "fz",
		label: "KFC",
		logo: "https://seeklogo.com/images/K/kfc-logo.png",
	},
	CatalogEntry {
		product: Product::Chagee,
		key: "chagee",
		service_code: "bwx",
		label: "Chagee",
		logo: "https://seeklogo.com/images/C/chagee-logo.png",
	},
	CatalogEntry {
		product: Product::Tealive,
		key: "tealive",
		service_code: "avb",
		label: "Tealive",
		logo: "https://seeklogo.com/images/T/tealive-logo.png",
	},
];
