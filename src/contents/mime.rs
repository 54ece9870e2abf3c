use std::path::Path;

/// mime_guess 内置表中缺失的数据集格式
fn dataset_content_type(ext: &str) -> Option<&'static str> {
    match ext {
        "hdf5" | "h5" | "he5" => Some("application/x-hdf5"),
        "nc" | "nc4" => Some("application/x-netcdf"),
        "zarr" => Some("application/vnd+zarr"),
        "parquet" => Some("application/vnd.apache.parquet"),
        _ => None,
    }
}

/// 根据磁盘路径的扩展名推断 mimetype
///
/// 无匹配时返回 `None`，由调用方决定兜底值。
pub fn guess_mimetype(os_path: &Path) -> Option<String> {
    let ext = os_path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if let Some(known) = dataset_content_type(&ext) {
        return Some(known.to_string());
    }
    mime_guess::from_path(os_path)
        .first_raw()
        .map(str::to_string)
}
