//! HTTP request handlers for API endpoints

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use stlcost::{Config, Material, PrintProfile, ProfileModel};
use tracing::{info, warn};

use crate::{
    types::{ApiError, HealthResponse, QuoteResponse, UploadForm},
    AppState,
};

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>STL Filament Cost Calculator</title></head>
<body>
<h1>STL Filament Cost Calculator</h1>
<p>Send a multipart <code>POST</code> request to <code>/api/upload</code> with:</p>
<ul>
  <li><strong>file:</strong> STL file (binary, required)</li>
  <li><strong>infill:</strong> Infill density (%) [default: 15]</li>
  <li><strong>material:</strong> pla, abs, petg or a density in g/cm³ [default: pla (1.24)]</li>
  <li><strong>model:</strong> simple or shell-aware [default: simple]</li>
  <li><strong>layer_height:</strong> Layer height (mm) [default: 0.2]</li>
</ul>
<form action="/api/upload" method="post" enctype="multipart/form-data">
  <input type="file" name="file" accept=".stl">
  <input type="number" name="infill" value="15" min="0" max="100">
  <select name="material">
    <option value="pla">PLA</option>
    <option value="abs">ABS</option>
    <option value="petg">PETG</option>
  </select>
  <button type="submit">Quote</button>
</form>
</body>
</html>
"#;

/// Usage page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Quote an uploaded STL file
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<QuoteResponse>, ApiError> {
    let limit = state.config.server.max_upload_bytes;
    let form = read_form(multipart, limit).await?;

    let size = form.file.as_ref().map_or(0, Vec::len);
    let response = quote_upload(&state.config, form).map_err(|e| {
        warn!(code = %e.body.code, "Rejected upload: {}", e.body.error);
        e
    })?;

    info!(bytes = size, price = %response.price, "Quoted upload");
    Ok(Json(response))
}

async fn read_form(mut multipart: Multipart, limit: usize) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.len() > limit {
                    return Err(ApiError::too_large(limit));
                }
                form.file = Some(bytes.to_vec());
            }
            "infill" => form.infill = Some(field.text().await.map_err(multipart_error)?),
            "material" => form.material = Some(field.text().await.map_err(multipart_error)?),
            "model" => form.model = Some(field.text().await.map_err(multipart_error)?),
            "layer_height" => {
                form.layer_height = Some(field.text().await.map_err(multipart_error)?)
            }
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    let status = err.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::new(status, "too_large", err.body_text());
    }
    ApiError::new(status, "bad_multipart", err.body_text())
}

/// Decode and price an upload form against the configured defaults.
pub fn quote_upload(config: &Config, form: UploadForm) -> Result<QuoteResponse, ApiError> {
    let Some(bytes) = form.file.as_deref() else {
        return Err(ApiError::no_file());
    };
    let profile = profile_from_form(config, &form)?;

    let breakdown = stlcost::quote(bytes, &profile)?;
    Ok(QuoteResponse {
        price: config.pricing.format(breakdown.price),
        breakdown,
    })
}

/// Overlay non-empty form fields on the configured print profile.
fn profile_from_form(config: &Config, form: &UploadForm) -> Result<PrintProfile, ApiError> {
    let mut profile = config.print_profile();

    if let Some(infill) = non_empty(form.infill.as_deref()) {
        profile.infill_density = parse_number("infill", infill)?;
    }
    if let Some(material) = non_empty(form.material.as_deref()) {
        profile = profile.with_material(material.parse::<Material>()?);
    }
    if let Some(model) = non_empty(form.model.as_deref()) {
        profile = profile.with_model(model.parse::<ProfileModel>()?);
    }
    if let Some(layer_height) = non_empty(form.layer_height.as_deref()) {
        profile.layer_height = parse_number("layer_height", layer_height)?;
    }

    Ok(profile)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_number(name: &str, value: &str) -> Result<f64, ApiError> {
    value.parse::<f64>().map_err(|_| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "invalid_parameter",
            format!("invalid parameter `{name}`: `{value}` is not a number"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stlcost::{cube_triangles, stl};

    fn cube() -> Vec<u8> {
        stl::to_bytes("cube", &cube_triangles([0.0, 0.0, 0.0], 10.0))
    }

    fn form(file: Option<Vec<u8>>) -> UploadForm {
        UploadForm {
            file,
            ..Default::default()
        }
    }

    #[test]
    fn test_quote_defaults() {
        let resp = quote_upload(&Config::default(), form(Some(cube()))).unwrap();
        assert_eq!(resp.price, "$0.06");
        assert_eq!(resp.breakdown.model, ProfileModel::Simple);
    }

    #[test]
    fn test_quote_with_fields() {
        let upload = UploadForm {
            infill: Some("100".into()),
            material: Some("abs".into()),
            model: Some("shell-aware".into()),
            layer_height: Some(" ".into()),
            ..form(Some(cube()))
        };
        let resp = quote_upload(&Config::default(), upload).unwrap();
        assert_eq!(resp.breakdown.model, ProfileModel::ShellAware);
        assert!((resp.breakdown.infill_volume - 1.0).abs() < 1e-9);
        assert!((resp.breakdown.total_weight - resp.breakdown.total_volume * 1.04).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file() {
        let err = quote_upload(&Config::default(), form(None)).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.code, "no_file");
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let short = quote_upload(&Config::default(), form(Some(vec![0; 10]))).unwrap_err();
        assert_eq!(short.status, StatusCode::BAD_REQUEST);
        assert_eq!(short.body.code, "malformed_input");

        let mut extra = cube();
        extra.push(0);
        let parse = quote_upload(&Config::default(), form(Some(extra))).unwrap_err();
        assert_eq!(parse.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(parse.body.code, "parse_error");

        let upload = UploadForm {
            infill: Some("150".into()),
            ..form(Some(cube()))
        };
        let invalid = quote_upload(&Config::default(), upload).unwrap_err();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.body.code, "invalid_parameter");
    }

    #[test]
    fn test_non_numeric_field() {
        let upload = UploadForm {
            infill: Some("lots".into()),
            ..form(Some(cube()))
        };
        let err = quote_upload(&Config::default(), upload).unwrap_err();
        assert_eq!(err.body.code, "invalid_parameter");
        assert!(err.body.error.contains("infill"));
    }

    #[test]
    fn test_unknown_material() {
        let upload = UploadForm {
            material: Some("wood".into()),
            ..form(Some(cube()))
        };
        let err = quote_upload(&Config::default(), upload).unwrap_err();
        assert_eq!(err.body.code, "invalid_parameter");
    }
}
