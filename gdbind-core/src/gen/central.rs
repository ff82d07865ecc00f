use crate :: sys ; # [doc = r" Version of the class database that the bindings were generated from."] pub const API_VERSION : sys :: ApiVersion = sys :: ApiVersion { major : 4 , minor : 3 , } ; pub const API_VERSION_FULL_NAME : & str = "Godot Engine v4.3.stable.official" ; # [doc = r" Every non-virtual engine method, in method table order."] pub static METHOD_SPECS : & [sys :: MethodSpec] = & [sys :: MethodSpec { class : c"Object" , method : c"get_class" , hash : 201670096 , params : & [] , ret : Some (sys :: ArgKind :: Builtin (sys :: VariantType :: String)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Object" , method : c"get_instance_id" , hash : 2455072627 , params : & [] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Int)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Object" , method : c"has_method" , hash : 2619796661 , params : & [sys :: ArgKind :: Builtin (sys :: VariantType :: String)] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Bool)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Object" , method : c"call" , hash : 3400424181 , params : & [sys :: ArgKind :: Builtin (sys :: VariantType :: String)] , ret : Some (sys :: ArgKind :: Variant) , is_vararg : true , is_const : false , } , sys :: MethodSpec { class : c"Object" , method : c"emit_signal" , hash : 4047867050 , params : & [sys :: ArgKind :: Builtin (sys :: VariantType :: String)] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Int)) , is_vararg : true , is_const : false , } , sys :: MethodSpec { class : c"Object" , method : c"connect" , hash : 1518946055 , params : & [sys :: ArgKind :: Builtin (sys :: VariantType :: String) , sys :: ArgKind :: Builtin (sys :: VariantType :: Callable) , sys :: ArgKind :: Primitive (sys :: VariantType :: Int)] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Int)) , is_vararg : false , is_const : false , } , sys :: MethodSpec { class : c"RefCounted" , method : c"init_ref" , hash : 2240911060 , params : & [] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Bool)) , is_vararg : false , is_const : false , } , sys :: MethodSpec { class : c"RefCounted" , method : c"reference" , hash : 2240911060 , params : & [] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Bool)) , is_vararg : false , is_const : false , } , sys :: MethodSpec { class : c"RefCounted" , method : c"unreference" , hash : 2240911060 , params : & [] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Bool)) , is_vararg : false , is_const : false , } , sys :: MethodSpec { class : c"RefCounted" , method : c"get_reference_count" , hash : 3905245786 , params : & [] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Int)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Node" , method : c"set_name" , hash : 83702148 , params : & [sys :: ArgKind :: Builtin (sys :: VariantType :: String)] , ret : None , is_vararg : false , is_const : false , } , sys :: MethodSpec { class : c"Node" , method : c"get_name" , hash : 2002593661 , params : & [] , ret : Some (sys :: ArgKind :: Builtin (sys :: VariantType :: String)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Node" , method : c"add_child" , hash : 3863233950 , params : & [sys :: ArgKind :: Object , sys :: ArgKind :: Primitive (sys :: VariantType :: Bool)] , ret : None , is_vararg : false , is_const : false , } , sys :: MethodSpec { class : c"Node" , method : c"get_child" , hash : 541253412 , params : & [sys :: ArgKind :: Primitive (sys :: VariantType :: Int)] , ret : Some (sys :: ArgKind :: Object) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Node" , method : c"get_child_count" , hash : 894402480 , params : & [] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Int)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Node" , method : c"set_process_mode" , hash : 1841290486 , params : & [sys :: ArgKind :: Primitive (sys :: VariantType :: Int)] , ret : None , is_vararg : false , is_const : false , } , sys :: MethodSpec { class : c"Node" , method : c"get_process_mode" , hash : 739966102 , params : & [] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Int)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Node2D" , method : c"set_position" , hash : 743155724 , params : & [sys :: ArgKind :: Primitive (sys :: VariantType :: Vector2)] , ret : None , is_vararg : false , is_const : false , } , sys :: MethodSpec { class : c"Node2D" , method : c"get_position" , hash : 3341600327 , params : & [] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Vector2)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Node2D" , method : c"rotate" , hash : 373806689 , params : & [sys :: ArgKind :: Primitive (sys :: VariantType :: Float)] , ret : None , is_vararg : false , is_const : false , } , sys :: MethodSpec { class : c"Node2D" , method : c"get_rotation" , hash : 1740695150 , params : & [] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Float)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Resource" , method : c"set_name" , hash : 83702148 , params : & [sys :: ArgKind :: Builtin (sys :: VariantType :: String)] , ret : None , is_vararg : false , is_const : false , } , sys :: MethodSpec { class : c"Resource" , method : c"get_name" , hash : 201670096 , params : & [] , ret : Some (sys :: ArgKind :: Builtin (sys :: VariantType :: String)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Vector2Sum" , method : c"add" , hash : 2421519937 , params : & [sys :: ArgKind :: Primitive (sys :: VariantType :: Float) , sys :: ArgKind :: Primitive (sys :: VariantType :: Float)] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Float)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Vector2Sum" , method : c"add_vectors" , hash : 2536981235 , params : & [sys :: ArgKind :: Primitive (sys :: VariantType :: Vector2) , sys :: ArgKind :: Primitive (sys :: VariantType :: Vector2)] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Vector2)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Vector2Sum" , method : c"scale" , hash : 3046346296 , params : & [sys :: ArgKind :: Primitive (sys :: VariantType :: Vector2) , sys :: ArgKind :: Primitive (sys :: VariantType :: Float)] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Vector2)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Vector2Sum" , method : c"sum_array" , hash : 2380489151 , params : & [sys :: ArgKind :: PackedArray (sys :: VariantType :: PackedFloat64Array)] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Float)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Vector2Sum" , method : c"join" , hash : 1304263574 , params : & [sys :: ArgKind :: PackedArray (sys :: VariantType :: PackedStringArray) , sys :: ArgKind :: Builtin (sys :: VariantType :: String)] , ret : Some (sys :: ArgKind :: Builtin (sys :: VariantType :: String)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Vector2Sum" , method : c"check_positive" , hash : 3391281136 , params : & [sys :: ArgKind :: Primitive (sys :: VariantType :: Int)] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Int)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Vector2Sum" , method : c"fill_squares" , hash : 1286410249 , params : & [sys :: ArgKind :: Pointer , sys :: ArgKind :: Primitive (sys :: VariantType :: Int)] , ret : None , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Vector2Sum" , method : c"push_value" , hash : 1286410250 , params : & [sys :: ArgKind :: Primitive (sys :: VariantType :: Int)] , ret : None , is_vararg : false , is_const : false , } , sys :: MethodSpec { class : c"Vector2Sum" , method : c"values" , hash : 3995934104 , params : & [] , ret : Some (sys :: ArgKind :: PackedArray (sys :: VariantType :: PackedInt64Array)) , is_vararg : false , is_const : true , } , sys :: MethodSpec { class : c"Vector2Sum" , method : c"values" , hash : 2870101100 , params : & [] , ret : Some (sys :: ArgKind :: PackedArray (sys :: VariantType :: PackedInt64Array)) , is_vararg : false , is_const : false , } , sys :: MethodSpec { class : c"Vector2Sum" , method : c"combine" , hash : 1012200034 , params : & [sys :: ArgKind :: Primitive (sys :: VariantType :: Float) , sys :: ArgKind :: Primitive (sys :: VariantType :: Float)] , ret : Some (sys :: ArgKind :: Primitive (sys :: VariantType :: Float)) , is_vararg : false , is_const : true , } ,] ; # [doc = r" Positions of methods in [`METHOD_SPECS`] and the method table built from it."] pub mod method_index { pub const Object__get_class : usize = 0 ; pub const Object__get_instance_id : usize = 1 ; pub const Object__has_method : usize = 2 ; pub const Object__call : usize = 3 ; pub const Object__emit_signal : usize = 4 ; pub const Object__connect : usize = 5 ; pub const RefCounted__init_ref : usize = 6 ; pub const RefCounted__reference : usize = 7 ; pub const RefCounted__unreference : usize = 8 ; pub const RefCounted__get_reference_count : usize = 9 ; pub const Node__set_name : usize = 10 ; pub const Node__get_name : usize = 11 ; pub const Node__add_child : usize = 12 ; pub const Node__get_child : usize = 13 ; pub const Node__get_child_count : usize = 14 ; pub const Node__set_process_mode : usize = 15 ; pub const Node__get_process_mode : usize = 16 ; pub const Node2D__set_position : usize = 17 ; pub const Node2D__get_position : usize = 18 ; pub const Node2D__rotate : usize = 19 ; pub const Node2D__get_rotation : usize = 20 ; pub const Resource__set_name : usize = 21 ; pub const Resource__get_name : usize = 22 ; pub const Vector2Sum__add : usize = 23 ; pub const Vector2Sum__add_vectors : usize = 24 ; pub const Vector2Sum__scale : usize = 25 ; pub const Vector2Sum__sum_array : usize = 26 ; pub const Vector2Sum__join : usize = 27 ; pub const Vector2Sum__check_positive : usize = 28 ; pub const Vector2Sum__fill_squares : usize = 29 ; pub const Vector2Sum__push_value : usize = 30 ; pub const Vector2Sum__values : usize = 31 ; pub const Vector2Sum__values_mut : usize = 32 ; pub const Vector2Sum__combine : usize = 33 ; } # [doc = r" All engine classes, in class database order."] pub static CLASS_NAMES : & [& str] = & ["Object" , "RefCounted" , "Node" , "Node2D" , "Resource" , "Vector2Sum" ,] ;