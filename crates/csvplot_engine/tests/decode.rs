use csvplot_engine::decode_text;
use encoding_rs::SHIFT_JIS;
use pretty_assertions::assert_eq;

#[test]
fn utf8_text_is_passed_through() {
    let decoded = decode_text("name,値\nA,1\n".as_bytes()).unwrap();
    assert_eq!(decoded.text, "name,値\nA,1\n");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn utf8_bom_is_stripped() {
    let decoded = decode_text(b"\xEF\xBB\xBFa,b\n1,2\n").unwrap();
    assert_eq!(decoded.text, "a,b\n1,2\n");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn shift_jis_csv_is_detected() {
    let source = "時刻,温度,湿度,メモ\n0,21.5,40,はれのちくもり\n1,22.0,41,ときどきあめ\n2,22.4,43,かぜがつよい\n3,23.1,44,あしたもはれ\n";
    let (bytes, _, _) = SHIFT_JIS.encode(source);
    let decoded = decode_text(&bytes).unwrap();
    assert_eq!(decoded.text, source);
    assert_eq!(decoded.encoding_label, "Shift_JIS");
}
