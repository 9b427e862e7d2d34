pub mod event;
pub mod registration;

// タグと制御文字を取り除き、前後の空白を落とす。
// フォーム由来のテキストは保存前に必ずここを通す
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out.trim().to_string()
}

// メールアドレスの正規化。比較はすべてこの形に揃えてから行う
pub fn normalize_email(input: &str) -> String {
    input.trim().to_lowercase()
}
