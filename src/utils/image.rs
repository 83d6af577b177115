use anyhow::Error;
use opencv::core::{Mat, MatTraitConst, Vector, CV_16U, CV_32F, CV_8U};
use opencv::imgcodecs::{imdecode, imencode, IMREAD_COLOR};
use opencv::imgproc::{cvt_color, COLOR_BGR2RGB, COLOR_RGB2BGR};
use crate::error::HolisticError;

pub const BGR_CHANNELS: i32 = 3;

/// check_color_image verifies the input is a non-empty 2D image with three color channels.
///
/// # Arguments
/// * `img` - OpenCV matrix
///
/// # Returns
/// * `Result<(), Error>` - `HolisticError::ImageFormat` when the layout is not usable
pub fn check_color_image(img: &Mat) -> Result<(), Error> {
    if img.empty() {
        return Err(HolisticError::ImageFormat("input image is empty".to_string()).into())
    }
    if img.dims() != 2 {
        return Err(HolisticError::ImageFormat(format!("expected a 2-dimensional image, got {} dimensions", img.dims())).into())
    }
    if img.channels() != BGR_CHANNELS {
        return Err(HolisticError::ImageFormat(format!("expected {} channels, got {}", BGR_CHANNELS, img.channels())).into())
    }
    let depth = img.depth();
    if depth != CV_8U && depth != CV_16U && depth != CV_32F {
        return Err(HolisticError::ImageFormat(format!("unsupported pixel depth {}", depth)).into())
    }
    Ok(())
}

fn swap_channels(img: &Mat, code: i32) -> Result<Mat, Error> {
    check_color_image(img)?;
    let mut converted_img = Mat::default();
    cvt_color(img, &mut converted_img, code, 0)?;
    Ok(converted_img)
}

/// bgr_to_rgb converts an OpenCV BGR frame to RGB channel ordering.
pub fn bgr_to_rgb(img: &Mat) -> Result<Mat, Error> {
    swap_channels(img, COLOR_BGR2RGB)
}

/// rgb_to_bgr converts an RGB frame back to OpenCV's BGR channel ordering.
pub fn rgb_to_bgr(img: &Mat) -> Result<Mat, Error> {
    swap_channels(img, COLOR_RGB2BGR)
}

/// decode_image decodes encoded image bytes (jpeg, png, ...) into a BGR matrix.
///
/// # Arguments
/// * `im_bytes` - encoded image bytes
///
/// # Returns
/// * `Result<Mat, Error>`
pub fn decode_image(im_bytes: &[u8]) -> Result<Mat, Error> {
    let buf = Vector::<u8>::from_slice(im_bytes);
    let img_bgr = imdecode(&buf, IMREAD_COLOR)?;
    if img_bgr.empty() {
        return Err(HolisticError::ImageFormat("could not decode image bytes".to_string()).into())
    }
    Ok(img_bgr)
}

/// encode_image encodes a BGR matrix with the codec picked from `ext` (e.g. ".png").
pub fn encode_image(img: &Mat, ext: &str) -> Result<Vec<u8>, Error> {
    check_color_image(img)?;
    let mut buf = Vector::<u8>::new();
    if !imencode(ext, img, &mut buf, &Vector::new())? {
        return Err(HolisticError::ImageFormat(format!("could not encode image as {}", ext)).into())
    }
    Ok(buf.to_vec())
}

#[cfg(test)]
mod tests {
    use opencv::core::{Mat, MatTraitConst, MatTraitConstManual, MatTraitManual, Scalar, Vec3b, Vec3w, VecN, CV_16UC3, CV_32FC3, CV_8UC1, CV_8UC3, CV_8UC4};
    use crate::error::HolisticError;
    use crate::utils::image::{bgr_to_rgb, check_color_image, decode_image, encode_image, rgb_to_bgr};

    fn gradient_image() -> Mat {
        let mut img = Mat::new_rows_cols_with_default(12, 16, CV_8UC3, Scalar::all(0.0)).unwrap();
        for y in 0..12 {
            for x in 0..16 {
                let px = img.at_2d_mut::<Vec3b>(y, x).unwrap();
                *px = VecN([(x * 13) as u8, (y * 17) as u8, ((x + y) * 7) as u8]);
            }
        }
        img
    }

    #[test]
    fn test_bgr_to_rgb_swaps_channels() {
        let img = Mat::new_rows_cols_with_default(4, 4, CV_8UC3, Scalar::new(10.0, 20.0, 30.0, 0.0)).unwrap();
        let rgb = bgr_to_rgb(&img).unwrap();
        let px = rgb.at_2d::<Vec3b>(2, 2).unwrap();
        assert_eq!((px[0], px[1], px[2]), (30, 20, 10));
    }

    #[test]
    fn test_color_conversion_round_trip() {
        let img = gradient_image();
        let back = rgb_to_bgr(&bgr_to_rgb(&img).unwrap()).unwrap();
        assert_eq!(img.data_bytes().unwrap(), back.data_bytes().unwrap());
    }

    #[test]
    fn test_float_round_trip() {
        let img = Mat::new_rows_cols_with_default(3, 5, CV_32FC3, Scalar::new(0.125, 0.5, 0.875, 0.0)).unwrap();
        let back = rgb_to_bgr(&bgr_to_rgb(&img).unwrap()).unwrap();
        assert_eq!(img.data_bytes().unwrap(), back.data_bytes().unwrap());
    }

    #[test]
    fn test_u16_round_trip() {
        let img = Mat::new_rows_cols_with_default(4, 6, CV_16UC3, Scalar::new(1000.0, 30000.0, 65535.0, 0.0)).unwrap();
        let rgb = bgr_to_rgb(&img).unwrap();
        let px = rgb.at_2d::<Vec3w>(2, 3).unwrap();
        assert_eq!((px[0], px[1], px[2]), (65535, 30000, 1000));
        assert_eq!(rgb.typ(), CV_16UC3);

        let back = rgb_to_bgr(&rgb).unwrap();
        assert_eq!(img.data_bytes().unwrap(), back.data_bytes().unwrap());
    }

    #[test]
    fn test_rejects_bad_layouts() {
        for typ in [CV_8UC1, CV_8UC4] {
            let img = Mat::new_rows_cols_with_default(4, 4, typ, Scalar::all(0.0)).unwrap();
            let err = check_color_image(&img).unwrap_err();
            assert!(matches!(err.downcast_ref::<HolisticError>(), Some(HolisticError::ImageFormat(_))));
        }

        let err = bgr_to_rgb(&Mat::default()).unwrap_err();
        assert!(matches!(err.downcast_ref::<HolisticError>(), Some(HolisticError::ImageFormat(_))));
    }

    #[test]
    fn test_encode_decode_png() {
        let img = gradient_image();
        let bytes = encode_image(&img, ".png").unwrap();
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.rows(), 12);
        assert_eq!(decoded.cols(), 16);
        assert_eq!(img.data_bytes().unwrap(), decoded.data_bytes().unwrap());
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode_image(b"definitely not an image").is_err());
    }
}
