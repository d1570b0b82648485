/// Broker-unique client id in the form `<name>-<unix millis>`
pub(crate) fn timestamped_client_id(name: impl Into<String>) -> String {
    let mut client_id = name.into();
    client_id.push('-');
    client_id.push_str(&chrono::Utc::now().timestamp_millis().to_string());
    client_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_has_name_and_millis() {
        let id = timestamped_client_id("sf6-monitor");
        let millis = id
            .strip_prefix("sf6-monitor-")
            .expect("prefix should be kept");
        assert!(millis.parse::<i64>().is_ok_and(|m| m > 0));
    }
}
