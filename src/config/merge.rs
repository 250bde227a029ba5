use serde_yaml::Value;

/// 環境別オーバーレイを base に重ねる。
/// マッピングはキー単位で再帰的に重ね、空値 (`~`) のキーは base の値を残す。
pub fn merge_yaml(base: &mut Value, overlay: &Value) {
    if overlay.is_null() {
        return;
    }
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                if let Some(existing) = base_map.get_mut(key) {
                    merge_yaml(existing, value);
                } else if !value.is_null() {
                    base_map.insert(key.clone(), value.clone());
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}
