// Direct lighting commands: solid color, white level, and off.

use crate::device::client::DeviceApi;
use crate::error::ApiFailure;
use crate::models::Hsl;

impl DeviceApi {
    /// `GET /api/color?hue=&saturation=&lightness=`
    pub async fn set_color(&self, color: Hsl) -> Result<(), ApiFailure> {
        let mut url = self.endpoint_url(&["api", "color"]);
        url.query_pairs_mut()
            .append_pair("hue", &color.hue.to_string())
            .append_pair("saturation", &color.saturation.to_string())
            .append_pair("lightness", &color.lightness.to_string());
        self.get(url).await.map(|_| ())
    }

    /// `GET /api/on?level=`
    pub async fn set_white(&self, level: u8) -> Result<(), ApiFailure> {
        let mut url = self.endpoint_url(&["api", "on"]);
        url.query_pairs_mut()
            .append_pair("level", &level.to_string());
        self.get(url).await.map(|_| ())
    }

    /// `GET /api/off`
    pub async fn set_off(&self) -> Result<(), ApiFailure> {
        let url = self.endpoint_url(&["api", "off"]);
        self.get(url).await.map(|_| ())
    }
}
