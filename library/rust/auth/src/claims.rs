//! JWT Claims 構造体。

use serde::Deserialize;

/// Claims は JWT トークンの検証済みクレームセット。
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// ユーザーの一意識別子
    pub sub: String,

    /// トークン発行者
    pub iss: String,

    /// トークンの対象オーディエンス
    #[serde(default)]
    pub aud: Audience,

    /// トークンの有効期限（Unix タイムスタンプ）
    pub exp: u64,

    /// トークンの発行時刻（Unix タイムスタンプ）
    pub iat: u64,

    /// Authorized party
    #[serde(default)]
    pub azp: Option<String>,

    /// スコープ
    #[serde(default)]
    pub scope: Option<String>,

    /// 認可サーバーの RBAC 設定で付与されるパーミッション一覧。
    /// RBAC が無効なトークンにはこの Claim 自体が含まれない。
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// Audience は JWT の aud Claim を表す。
/// 文字列または文字列配列のどちらも受け付ける。
#[derive(Debug, Clone, Default)]
pub struct Audience(pub Vec<String>);

impl<'de> Deserialize<'de> for Audience {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de;

        struct AudienceVisitor;

        impl<'de> de::Visitor<'de> for AudienceVisitor {
            type Value = Audience;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string or array of strings")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Audience(vec![v.to_string()]))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut values = Vec::new();
                while let Some(v) = seq.next_element::<String>()? {
                    values.push(v);
                }
                Ok(Audience(values))
            }
        }

        deserializer.deserialize_any(AudienceVisitor)
    }
}

impl Claims {
    /// 最初のオーディエンスを返す。
    pub fn audience(&self) -> Option<&str> {
        self.aud.0.first().map(|s| s.as_str())
    }

    /// permissions Claim の一覧を返す。Claim が無い場合は空スライス。
    pub fn permission_list(&self) -> &[String] {
        self.permissions.as_deref().unwrap_or(&[])
    }
}

impl std::fmt::Display for Claims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Claims{{sub={}, iss={}, aud={:?}, permissions={}}}",
            self.sub,
            self.iss,
            self.audience(),
            self.permission_list().len(),
        )
    }
}
