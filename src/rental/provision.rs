//! Number acquisition (`getNumber`).

// self
use crate::{
	_prelude::*,
	error::ProvisioningFailure,
	obs::{self, FlowKind},
	rental::{Activation, NumberReply, RentalClient},
};

impl RentalClient {
	/// Rents one number for `service_code` in `country`. One attempt, no retry.
	///
	/// The returned activation is stamped with the current time and the client's OTP window.
	pub async fn provision(
		&self,
		service_code: &str,
		country: u32,
	) -> Result<Activation, ProvisioningFailure> {
		obs::observe(FlowKind::ProvisionNumber, "provision", self.provision_once(service_code, country))
			.await
	}

	async fn provision_once(
		&self,
		service_code: &str,
		country: u32,
	) -> Result<Activation, ProvisioningFailure> {
		let country = country.to_string();
		let params = [("service", service_code), ("country", country.as_str())];
		let line = self.call("getNumber", &params).await?;

		match NumberReply::parse(&line)? {
			NumberReply::Granted { activation_id, phone_number } => Ok(Activation::new(
				activation_id,
				phone_number,
				service_code,
				OffsetDateTime::now_utc(),
				self.otp_window,
			)),
			NumberReply::Rejected(rejection) => Err(ProvisioningFailure::Rejected(rejection)),
		}
	}
}
